//! Report renderers.
//!
//! Every renderer is a pure, read-only projection of one `Profile` streamed
//! into a caller-supplied `io::Write` sink:
//! - `table`  - ranked total/self percentage table
//! - `graph`  - graphviz digraph of the call graph
//! - `source` - per-line sample counts interleaved with source text
//! - `dump`   - the whole profile as pretty JSON

pub mod dump;
pub mod graph;
pub mod source;
pub mod table;

pub use crate::aggregator::metrics::TieBreak;
pub use dump::{dump_to_string, render_dump};
pub use graph::render_graph;
pub use source::{
    render_source, FsSourceReader, NameFilter, SkipReason, SkippedFrame, SourceReader,
    SourceReport,
};
pub use table::render_table;

use crate::utils::config::{DEFAULT_SOURCE_WINDOW, WEIGHT_SCALE};
use crate::utils::error::RenderError;
use std::fmt;

/// How percentages are rounded to one decimal place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    /// 0.05 rounds away from zero
    #[default]
    HalfUp,
    /// 0.05 rounds to the even tenth
    HalfEven,
}

/// Settings shared by all renderers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub rounding: Rounding,
    pub tie_break: TieBreak,
    /// Lines shown past the start line for frames without line samples
    pub source_window: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            rounding: Rounding::HalfUp,
            tie_break: TieBreak::IdAscending,
            source_window: DEFAULT_SOURCE_WINDOW,
        }
    }
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_source_window(mut self, lines: u32) -> Self {
        self.source_window = lines;
        self
    }

    /// `count / total` as a percentage, using this config's rounding
    pub fn percent(&self, count: u64, total: u64) -> Percent {
        Percent::of(count, total, self.rounding)
    }
}

/// A percentage rounded to tenths, displayed as `47.9%`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent {
    tenths: u64,
}

impl Percent {
    /// `count / total * 100`; zero when `total` is zero
    pub fn of(count: u64, total: u64, rounding: Rounding) -> Self {
        if total == 0 {
            return Self { tenths: 0 };
        }

        let scaled = count as u128 * 1000;
        let total = total as u128;
        let quotient = scaled / total;
        let twice_remainder = (scaled % total) * 2;

        let round_up = match twice_remainder.cmp(&total) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => match rounding {
                Rounding::HalfUp => true,
                Rounding::HalfEven => quotient % 2 == 1,
            },
        };

        let tenths = quotient + u128::from(round_up);
        Self {
            tenths: u64::try_from(tenths).unwrap_or(u64::MAX),
        }
    }

    pub fn tenths(&self) -> u64 {
        self.tenths
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}%", self.tenths / 10, self.tenths % 10)
    }
}

/// Graph styling weight: `base + 28 * count / overall`, or `base` for an empty run
pub fn visual_weight(base: f64, count: u64, overall_samples: u64) -> f64 {
    if overall_samples == 0 {
        return base;
    }
    base + WEIGHT_SCALE * (count as f64 / overall_samples as f64)
}

/// Run a renderer into an in-memory buffer
pub fn render_to_string<F>(render: F) -> Result<String, RenderError>
where
    F: FnOnce(&mut Vec<u8>) -> Result<(), RenderError>,
{
    let mut buffer = Vec::new();
    render(&mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_half_up() {
        assert_eq!(Percent::of(361, 754, Rounding::HalfUp).to_string(), "47.9%");
        assert_eq!(Percent::of(194, 754, Rounding::HalfUp).to_string(), "25.7%");
        assert_eq!(Percent::of(194, 194, Rounding::HalfUp).to_string(), "100.0%");
        // 1/8 = 12.5% exactly, 1/16 = 6.25%
        assert_eq!(Percent::of(1, 16, Rounding::HalfUp).to_string(), "6.3%");
    }

    #[test]
    fn test_percent_half_even() {
        assert_eq!(Percent::of(1, 16, Rounding::HalfEven).to_string(), "6.2%");
        assert_eq!(Percent::of(3, 16, Rounding::HalfEven).to_string(), "18.8%");
        assert_eq!(Percent::of(361, 754, Rounding::HalfEven).to_string(), "47.9%");
    }

    #[test]
    fn test_percent_zero_total() {
        assert_eq!(Percent::of(0, 0, Rounding::HalfUp).to_string(), "0.0%");
        assert_eq!(Percent::of(5, 0, Rounding::HalfEven).tenths(), 0);
    }

    #[test]
    fn test_visual_weight() {
        assert_eq!(visual_weight(10.0, 0, 0), 10.0);
        assert_eq!(visual_weight(10.0, 50, 100), 24.0);
        assert!(visual_weight(10.0, 2, 100) > visual_weight(10.0, 1, 100));
    }

    #[test]
    fn test_config_builder() {
        let config = ReportConfig::new()
            .with_rounding(Rounding::HalfEven)
            .with_tie_break(TieBreak::IdDescending)
            .with_source_window(3);

        assert_eq!(config.rounding, Rounding::HalfEven);
        assert_eq!(config.tie_break, TieBreak::IdDescending);
        assert_eq!(config.source_window, 3);
        assert_eq!(config.percent(1, 3).to_string(), "33.3%");
    }
}
