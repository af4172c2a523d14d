//! Rendered report output writer.
//!
//! Writes text reports (tables, graphviz digraphs, annotated listings) to files.

use super::{ensure_parent_dir, validate_path};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a rendered report to a file
///
/// **Public** - main entry point for report files
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
///
/// # Example
/// ```ignore
/// let dot = render_to_string(|out| render_graph(&profile, out, None))?;
/// write_report(&dot, "profile.dot")?;
/// ```
pub fn write_report(content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_path(output_path)?;
    ensure_parent_dir(output_path)?;

    if let Some(ext) = output_path.extension() {
        if ext == "svg" || ext == "png" {
            debug!(
                "Report is graphviz/text, not an image; run it through `dot` first: {}",
                output_path.display()
            );
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Report written successfully ({} bytes, {:.2} KB)",
        content.len(),
        content.len() as f64 / 1024.0
    );

    Ok(())
}
