//! Integrity checks over a finished profile.
//!
//! Renderers run only the checks covering the data they project; loading a
//! profile from disk runs all of them.

use super::schema::{FrameId, FrameRecord, Profile};
use crate::utils::error::DataIntegrityError;
use log::debug;

/// Run every integrity check
pub fn validate_profile(profile: &Profile) -> Result<(), DataIntegrityError> {
    debug!("Validating profile with {} frames", profile.frames.len());

    check_callees(profile)?;
    for (id, frame) in &profile.frames {
        check_counts(*id, frame, profile.overall_samples)?;
        check_line_samples(*id, frame)?;
    }

    Ok(())
}

/// Every callee id must name a frame of the same profile
pub fn check_callees(profile: &Profile) -> Result<(), DataIntegrityError> {
    for (caller, frame) in &profile.frames {
        if let Some(callee) = frame
            .edges()
            .map(|(callee, _)| callee)
            .find(|callee| !profile.frames.contains_key(callee))
        {
            return Err(DataIntegrityError::DanglingCallee {
                caller: *caller,
                callee,
            });
        }
    }
    Ok(())
}

/// Per-line samples, when present, break down exactly the self samples
pub fn check_line_samples(id: FrameId, frame: &FrameRecord) -> Result<(), DataIntegrityError> {
    match frame.line_total() {
        Some(line_total) if line_total != frame.self_samples => {
            Err(DataIntegrityError::LineSamplesMismatch {
                frame: id,
                line_total,
                self_samples: frame.self_samples,
            })
        }
        _ => Ok(()),
    }
}

/// self <= total <= overall
pub fn check_counts(
    id: FrameId,
    frame: &FrameRecord,
    overall_samples: u64,
) -> Result<(), DataIntegrityError> {
    if frame.self_samples > frame.total_samples || frame.total_samples > overall_samples {
        return Err(DataIntegrityError::CountsOutOfRange {
            frame: id,
            self_samples: frame.self_samples,
            total_samples: frame.total_samples,
            overall_samples,
        });
    }
    Ok(())
}

impl Profile {
    /// Check all invariants; see [`validate_profile`]
    pub fn validate(&self) -> Result<(), DataIntegrityError> {
        validate_profile(self)
    }
}
