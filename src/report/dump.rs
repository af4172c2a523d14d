//! Raw structured dump of a whole profile.
//!
//! The dump is the profile's JSON schema, pretty-printed, so it can be read
//! back with `output::parse_profile`. Frames are keyed by id in ascending
//! order; per-frame fields always come in the order name, location,
//! total_samples, samples, edges, lines, and absent optional fields are left
//! out rather than written as `null`.

use crate::profile::Profile;
use crate::utils::error::RenderError;
use log::debug;
use std::io::Write;

/// Write the profile as pretty JSON followed by a newline
pub fn render_dump<W: Write>(profile: &Profile, out: &mut W) -> Result<(), RenderError> {
    debug!(
        "Dumping profile: mode {}, {} frames",
        profile.mode,
        profile.frames.len()
    );

    serde_json::to_writer_pretty(&mut *out, profile)?;
    writeln!(out)?;

    Ok(())
}

/// Dump into a string
pub fn dump_to_string(profile: &Profile) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(profile)? + "\n")
}
