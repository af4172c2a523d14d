//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::profile::FrameId;
use std::path::PathBuf;
use thiserror::Error;

/// The profile breaks one of its own invariants.
///
/// Fatal to the render call that detects it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataIntegrityError {
    #[error("frame {caller} has an edge to unknown frame {callee}")]
    DanglingCallee { caller: FrameId, callee: FrameId },

    #[error("frame {frame}: line samples sum to {line_total} but self samples are {self_samples}")]
    LineSamplesMismatch {
        frame: FrameId,
        line_total: u64,
        self_samples: u64,
    },

    #[error(
        "frame {frame}: expected self ({self_samples}) <= total ({total_samples}) <= overall ({overall_samples})"
    )]
    CountsOutOfRange {
        frame: FrameId,
        self_samples: u64,
        total_samples: u64,
        overall_samples: u64,
    },
}

/// A frame's source file could not be read
#[derive(Error, Debug)]
#[error("source unavailable: {}: {source}", path.display())]
pub struct SourceUnavailable {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors that abort a single render call
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("data integrity error: {0}")]
    Integrity(#[from] DataIntegrityError),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize profile: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid frame name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Recording a sample would push the run's sample count past `u64::MAX`
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("sample count overflow: {overall_samples} + {weight} does not fit in u64")]
pub struct SampleOverflow {
    pub overall_samples: u64,
    pub weight: u64,
}

/// Errors that can occur while loading profile input
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("invalid profile: {0}")]
    Integrity(#[from] DataIntegrityError),

    #[error("invalid input format at line {line}: {reason}")]
    InvalidFormat { line: usize, reason: String },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
