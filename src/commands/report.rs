//! Report command implementation.
//!
//! The report commands:
//! 1. Read and validate the profile JSON
//! 2. Log sample distribution statistics
//! 3. Render the requested report
//! 4. Write it to stdout or a file

use super::models::{ReportArgs, ReportKind};
use crate::aggregator::calculate_sample_distribution;
use crate::output::{read_profile, write_report};
use crate::profile::Profile;
use crate::report::{
    render_dump, render_graph, render_source, render_table, render_to_string, FsSourceReader,
    ReportConfig, SkippedFrame,
};
use crate::utils::error::RenderError;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// A rendered report plus any frames the source report had to skip
#[derive(Debug)]
pub struct RenderedReport {
    pub text: String,
    pub skipped: Vec<SkippedFrame>,
}

/// Render one report kind into memory
///
/// **Public** - shared by the CLI and tests
pub fn render_report(
    profile: &Profile,
    kind: &ReportKind,
    config: &ReportConfig,
) -> Result<RenderedReport, RenderError> {
    let mut skipped = Vec::new();

    let text = match kind {
        ReportKind::Table => render_to_string(|out| render_table(profile, out, Some(config)))?,
        ReportKind::Graph => render_to_string(|out| render_graph(profile, out, Some(config)))?,
        ReportKind::Dump => render_to_string(|out| render_dump(profile, out))?,
        ReportKind::Source { method, matching } => {
            let filter = matching.filter(method)?;
            render_to_string(|out| {
                let report = render_source(profile, &filter, &FsSourceReader, out, Some(config))?;
                debug!(
                    "{} frames matched, {} listed",
                    report.matched(),
                    report.rendered.len()
                );
                skipped = report.skipped;
                Ok(())
            })?
        }
    };

    Ok(RenderedReport { text, skipped })
}

/// Execute a report command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Profile file missing, malformed or inconsistent
/// * Data integrity errors found while rendering
/// * Output file write errors
pub fn execute_report(args: ReportArgs) -> Result<()> {
    let start_time = Instant::now();

    info!(
        "Rendering {} report from: {}",
        args.kind.name(),
        args.input.display()
    );

    let profile = read_profile(&args.input)
        .with_context(|| format!("Failed to read profile {}", args.input.display()))?;

    let distribution = calculate_sample_distribution(&profile);
    info!("Sample distribution: {}", distribution.summary());
    if distribution.is_highly_concentrated() {
        debug!("Top 10% of frames hold most samples");
    }

    let rendered = render_report(&profile, &args.kind, &args.config)
        .with_context(|| format!("Failed to render {} report", args.kind.name()))?;

    for skipped in &rendered.skipped {
        eprintln!(
            "warning: no source for {} (frame {}): {}",
            skipped.name, skipped.frame, skipped.reason
        );
    }

    match &args.output {
        Some(path) => {
            write_report(&rendered.text, path).context("Failed to write report")?;
            info!("✓ Report written to: {}", path.display());
        }
        None => print!("{}", rendered.text),
    }

    let elapsed = start_time.elapsed();
    debug!("Report completed in {:.3}s", elapsed.as_secs_f64());

    Ok(())
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Profile path cannot be empty");
    }

    if !args.input.exists() {
        anyhow::bail!("Profile not found: {}", args.input.display());
    }

    if let ReportKind::Source { method, matching } = &args.kind {
        if method.is_empty() {
            anyhow::bail!("Method name cannot be empty");
        }
        matching
            .filter(method)
            .with_context(|| format!("Invalid method pattern: {}", method))?;
    }

    if let Some(output) = &args.output {
        if output == &args.input {
            anyhow::bail!("Refusing to overwrite the input profile");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::models::NameMatch;
    use crate::profile::{FrameRecord, SamplingMode};
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn profile() -> Profile {
        Profile::new(SamplingMode::Cpu { interval: 1000 }, 4)
            .with_frame(1u64, FrameRecord::new("main", 4, 1).with_callee(2u64, 3))
            .with_frame(2u64, FrameRecord::new("work", 3, 3))
    }

    #[test]
    fn test_render_each_kind() {
        let profile = profile();
        let config = ReportConfig::default();

        let table = render_report(&profile, &ReportKind::Table, &config).unwrap();
        assert!(table.text.starts_with("     TOTAL"));

        let graph = render_report(&profile, &ReportKind::Graph, &config).unwrap();
        assert!(graph.text.contains("1 -> 2"));

        let dump = render_report(&profile, &ReportKind::Dump, &config).unwrap();
        assert!(dump.text.contains("\"frames\""));
    }

    #[test]
    fn test_render_source_collects_skips() {
        let profile = Profile::new(SamplingMode::Cpu { interval: 1000 }, 1).with_frame(
            1u64,
            FrameRecord::new("work", 1, 1).with_location("/no/such/file.rb", Some(3)),
        );
        let kind = ReportKind::Source {
            method: "work".to_string(),
            matching: NameMatch::Exact,
        };

        let rendered = render_report(&profile, &kind, &ReportConfig::default()).unwrap();

        assert_eq!(rendered.text, "work (/no/such/file.rb:3)\n");
        assert_eq!(rendered.skipped.len(), 1);
    }

    #[test]
    fn test_validate_args_missing_input() {
        let args = ReportArgs {
            input: PathBuf::from("/no/such/profile.json"),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_empty_method() {
        let file = NamedTempFile::new().unwrap();
        let args = ReportArgs {
            input: file.path().to_path_buf(),
            kind: ReportKind::Source {
                method: String::new(),
                matching: NameMatch::Contains,
            },
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_render_source_by_pattern() {
        let profile = Profile::new(SamplingMode::Cpu { interval: 1000 }, 3)
            .with_frame(1u64, FrameRecord::new("A#pow", 1, 1).with_location("/no/a.rb", Some(1)))
            .with_frame(2u64, FrameRecord::new("A.newobj", 1, 1).with_location("/no/b.rb", Some(1)))
            .with_frame(3u64, FrameRecord::new("A#math", 1, 1).with_location("/no/c.rb", Some(1)));
        let kind = ReportKind::Source {
            method: "pow|newobj".to_string(),
            matching: NameMatch::Pattern,
        };

        let rendered = render_report(&profile, &kind, &ReportConfig::default()).unwrap();

        assert_eq!(rendered.text, "A#pow (/no/a.rb:1)\nA.newobj (/no/b.rb:1)\n");
        assert_eq!(rendered.skipped.len(), 2);
    }

    #[test]
    fn test_render_source_bad_pattern() {
        let kind = ReportKind::Source {
            method: "pow(".to_string(),
            matching: NameMatch::Pattern,
        };

        let result = render_report(&profile(), &kind, &ReportConfig::default());
        assert!(matches!(result, Err(RenderError::InvalidPattern(_))));
    }

    #[test]
    fn test_validate_args_bad_pattern() {
        let file = NamedTempFile::new().unwrap();
        let args = ReportArgs {
            input: file.path().to_path_buf(),
            kind: ReportKind::Source {
                method: "[unclosed".to_string(),
                matching: NameMatch::Pattern,
            },
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_output_is_input() {
        let file = NamedTempFile::new().unwrap();
        let args = ReportArgs {
            input: file.path().to_path_buf(),
            output: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_valid() {
        let file = NamedTempFile::new().unwrap();
        let args = ReportArgs {
            input: file.path().to_path_buf(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_ok());
    }
}
