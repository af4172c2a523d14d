//! Ranked frame table.
//!
//! ```text
//!      TOTAL    (pct)     SAMPLES    (pct)     FRAME
//!        361  (47.9%)         361  (47.9%)     A#pow
//!        727  (96.4%)           5   (0.7%)     A#initialize
//! ```

use super::ReportConfig;
use crate::aggregator::metrics::rank_frames;
use crate::profile::Profile;
use crate::utils::error::RenderError;
use log::debug;
use std::io::Write;

/// Write the table header and one row per frame, hottest first
///
/// A run with zero overall samples renders every percentage as `0.0%`.
pub fn render_table<W: Write>(
    profile: &Profile,
    out: &mut W,
    config: Option<&ReportConfig>,
) -> Result<(), RenderError> {
    let config = config.cloned().unwrap_or_default();
    let overall = profile.overall_samples;

    debug!("Rendering table for {} frames", profile.frames.len());

    writeln!(out, "{:>10}    (pct)  {:>10}    (pct)     FRAME", "TOTAL", "SAMPLES")?;

    for (_, frame) in rank_frames(profile, config.tie_break) {
        let total_pct = format!("({})", config.percent(frame.total_samples, overall));
        let self_pct = format!("({})", config.percent(frame.self_samples, overall));

        writeln!(
            out,
            "{:>10} {:>8}  {:>10} {:>8}     {}",
            frame.total_samples, total_pct, frame.self_samples, self_pct, frame.name
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{FrameRecord, SamplingMode};
    use crate::report::render_to_string;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_rows_in_rank_order() {
        let profile = Profile::new(SamplingMode::Cpu { interval: 1000 }, 754)
            .with_frame(2u64, FrameRecord::new("A#initialize", 727, 5).with_callee(1u64, 361))
            .with_frame(1u64, FrameRecord::new("A#pow", 361, 361));

        let text = render_to_string(|out| render_table(&profile, out, None)).unwrap();

        let expected = "\
     TOTAL    (pct)     SAMPLES    (pct)     FRAME
       361  (47.9%)         361  (47.9%)     A#pow
       727  (96.4%)           5   (0.7%)     A#initialize
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_table_zero_samples() {
        let profile = Profile::new(SamplingMode::Wall { interval: 1000 }, 0)
            .with_frame(1u64, FrameRecord::new("<main>", 0, 0));

        let text = render_to_string(|out| render_table(&profile, out, None)).unwrap();
        let row = text.lines().nth(1).unwrap();

        assert_eq!(row.matches("(0.0%)").count(), 2);
    }

    #[test]
    fn test_table_empty_profile_has_header_only() {
        let profile = Profile::new(SamplingMode::Cpu { interval: 1000 }, 0);
        let text = render_to_string(|out| render_table(&profile, out, None)).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
