//! JSON profile reader and writer.
//!
//! The file format is the one produced by the raw dump renderer.

use super::{ensure_parent_dir, validate_path};
use crate::profile::Profile;
use crate::utils::error::{OutputError, ParseError};
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Write a profile to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let profile = ProfileBuilder::from_collapsed(mode, &stacks)?;
/// write_profile(&profile, "profile.json")?;
/// ```
pub fn write_profile(profile: &Profile, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing profile to: {}", output_path.display());

    validate_path(output_path)?;
    ensure_parent_dir(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    // Same layout as the raw dump report
    serde_json::to_writer_pretty(&mut writer, profile)
        .map_err(OutputError::SerializationFailed)?;
    writeln!(writer).map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Profile written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read and validate a profile from a JSON file
///
/// **Public** - used by every report command
///
/// # Errors
/// * `ParseError::Io` - File read error
/// * `ParseError::JsonError` - JSON parse error
/// * `ParseError::Integrity` - The profile breaks its invariants
pub fn read_profile(input_path: impl AsRef<Path>) -> Result<Profile, ParseError> {
    let input_path = input_path.as_ref();

    debug!("Reading profile from: {}", input_path.display());

    let file = File::open(input_path)?;
    let profile = profile_from_reader(BufReader::new(file))?;

    debug!(
        "Profile loaded: version {}, mode {}, {} frames",
        profile.version,
        profile.mode,
        profile.frames.len()
    );

    Ok(profile)
}

/// Parse and validate a profile from JSON text
pub fn parse_profile(text: &str) -> Result<Profile, ParseError> {
    let profile: Profile = serde_json::from_str(text)?;
    profile.validate()?;
    Ok(profile)
}

/// Parse and validate a profile from any reader
pub fn profile_from_reader<R: Read>(reader: R) -> Result<Profile, ParseError> {
    let profile: Profile = serde_json::from_reader(reader)?;
    profile.validate()?;
    Ok(profile)
}
