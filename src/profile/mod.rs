//! Profile data model and integrity validation.
//!
//! This module handles:
//! - The sampled-run data model (profile, frames, sampling mode)
//! - Invariant checks relating frame, edge and line sample counts

pub mod schema;
pub mod validate;

// Re-export main types
pub use schema::{FrameId, FrameRecord, Profile, SamplingMode, SourceLocation};
pub use validate::{check_callees, check_counts, check_line_samples, validate_profile};
