//! Build command implementation.
//!
//! Turns a collapsed-stacks file (`root;child;leaf COUNT` per line) into a
//! profile JSON that the report commands can read.

use super::models::BuildArgs;
use crate::aggregator::{calculate_sample_distribution, ProfileBuilder};
use crate::output::write_profile;
use anyhow::{Context, Result};
use log::info;

/// Execute the build command
///
/// **Public** - main entry point called from main.rs
pub fn execute_build(args: BuildArgs) -> Result<()> {
    info!("Building {} profile from: {}", args.mode, args.input.display());

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read stacks {}", args.input.display()))?;

    let profile = ProfileBuilder::from_collapsed(args.mode, &text)
        .context("Failed to parse collapsed stacks")?;

    profile
        .validate()
        .context("Built profile is inconsistent")?;

    info!(
        "Sample distribution: {}",
        calculate_sample_distribution(&profile).summary()
    );

    write_profile(&profile, &args.output).context("Failed to write profile JSON")?;

    info!("✓ Profile written to: {}", args.output.display());

    Ok(())
}
