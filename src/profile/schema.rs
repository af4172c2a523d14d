//! Profile data model.
//!
//! A `Profile` is the finished result of one sampling run: the overall sample
//! count, how samples were triggered, and one `FrameRecord` per stack frame.
//! Frames refer to their callees by `FrameId` only, so recursive call graphs
//! never form ownership cycles.
//!
//! The serde layout below is also the on-disk JSON schema (see `report::dump`).

use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque, stable identifier of a frame within one profile.
///
/// Ids are not sequential or small; they only need to be unique.
/// The numeric order is the tie-break order used by frame ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(pub u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for FrameId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// What triggered sample capture, with its interval or threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SamplingMode {
    /// CPU-time timer, interval in microseconds
    Cpu { interval: u64 },
    /// Wall-clock timer, interval in microseconds
    Wall { interval: u64 },
    /// One sample every `every` object allocations
    ObjectAllocation { every: u64 },
}

impl SamplingMode {
    /// Short kind tag, as used on the command line
    pub fn kind(&self) -> &'static str {
        match self {
            SamplingMode::Cpu { .. } => "cpu",
            SamplingMode::Wall { .. } => "wall",
            SamplingMode::ObjectAllocation { .. } => "object-allocation",
        }
    }

    /// Interval (timer modes) or allocation threshold
    pub fn value(&self) -> u64 {
        match *self {
            SamplingMode::Cpu { interval } | SamplingMode::Wall { interval } => interval,
            SamplingMode::ObjectAllocation { every } => every,
        }
    }

    /// Build a mode from its kind tag, e.g. `"wall"`
    pub fn from_kind(kind: &str, value: u64) -> Option<Self> {
        match kind {
            "cpu" => Some(SamplingMode::Cpu { interval: value }),
            "wall" => Some(SamplingMode::Wall { interval: value }),
            "object-allocation" | "object" => Some(SamplingMode::ObjectAllocation { every: value }),
            _ => None,
        }
    }
}

impl fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.value())
    }
}

/// Where a frame's code begins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,

    /// 1-based first line; absent for synthetic frames
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.file, line),
            None => write!(f, "{}", self.file),
        }
    }
}

/// One stack frame's identity and statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Human-readable qualifier, e.g. `block in A#math`
    pub name: String,

    #[serde(default, rename = "location", skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,

    /// Samples in this frame or anything it called
    pub total_samples: u64,

    /// Samples where this frame was the leaf
    #[serde(rename = "samples")]
    pub self_samples: u64,

    /// Callee id -> samples flowing from this frame into it
    #[serde(default, rename = "edges", skip_serializing_if = "Option::is_none")]
    pub callees: Option<BTreeMap<FrameId, u64>>,

    /// Source line -> self samples observed on that line
    #[serde(default, rename = "lines", skip_serializing_if = "Option::is_none")]
    pub line_samples: Option<BTreeMap<u32, u64>>,
}

impl FrameRecord {
    pub fn new(name: impl Into<String>, total_samples: u64, self_samples: u64) -> Self {
        Self {
            name: name.into(),
            source_location: None,
            total_samples,
            self_samples,
            callees: None,
            line_samples: None,
        }
    }

    pub fn with_location(mut self, file: impl Into<String>, line: Option<u32>) -> Self {
        self.source_location = Some(SourceLocation::new(file, line));
        self
    }

    pub fn with_callee(mut self, callee: impl Into<FrameId>, weight: u64) -> Self {
        self.callees
            .get_or_insert_with(BTreeMap::new)
            .insert(callee.into(), weight);
        self
    }

    pub fn with_line_samples(mut self, lines: impl IntoIterator<Item = (u32, u64)>) -> Self {
        self.line_samples
            .get_or_insert_with(BTreeMap::new)
            .extend(lines);
        self
    }

    /// Iterate callee edges in id order (empty for leaf frames)
    pub fn edges(&self) -> impl Iterator<Item = (FrameId, u64)> + '_ {
        self.callees
            .iter()
            .flat_map(|callees| callees.iter().map(|(id, weight)| (*id, *weight)))
    }

    /// Sum of per-line samples, if any were recorded
    pub fn line_total(&self) -> Option<u64> {
        self.line_samples
            .as_ref()
            .map(|lines| lines.values().sum())
    }

    /// Whether the frame spends samples beyond its callees' time
    pub fn has_callee_time(&self) -> bool {
        self.self_samples < self.total_samples
    }
}

/// The complete result of one sampling run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Schema version for compatibility checking
    #[serde(default = "default_version")]
    pub version: String,

    pub mode: SamplingMode,

    /// Samples collected across the whole run
    #[serde(rename = "samples")]
    pub overall_samples: u64,

    #[serde(default)]
    pub frames: BTreeMap<FrameId, FrameRecord>,
}

fn default_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl Profile {
    pub fn new(mode: SamplingMode, overall_samples: u64) -> Self {
        Self {
            version: default_version(),
            mode,
            overall_samples,
            frames: BTreeMap::new(),
        }
    }

    pub fn with_frame(mut self, id: impl Into<FrameId>, frame: FrameRecord) -> Self {
        self.frames.insert(id.into(), frame);
        self
    }

    pub fn frame(&self, id: FrameId) -> Option<&FrameRecord> {
        self.frames.get(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
