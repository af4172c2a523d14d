//! Frame ranking and sample distribution metrics.
//!
//! Ranking is the shared ordering of the table and source reports: hottest
//! frames (by self samples) first.

use crate::profile::{FrameId, FrameRecord, Profile};
use log::debug;

/// Order between frames with equal self samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Lower frame id first
    #[default]
    IdAscending,
    /// Higher frame id first
    IdDescending,
}

/// Rank frames by self samples, descending
///
/// **Public** - shared input of the table, graph and source renderers
///
/// Equal self samples are ordered by frame id according to `tie_break`, so
/// ranking the same profile twice always gives the same sequence.
pub fn rank_frames(profile: &Profile, tie_break: TieBreak) -> Vec<(FrameId, &FrameRecord)> {
    let mut ranked: Vec<(FrameId, &FrameRecord)> =
        profile.frames.iter().map(|(id, frame)| (*id, frame)).collect();

    ranked.sort_by(|(a_id, a), (b_id, b)| {
        b.self_samples.cmp(&a.self_samples).then_with(|| match tie_break {
            TieBreak::IdAscending => a_id.cmp(b_id),
            TieBreak::IdDescending => b_id.cmp(a_id),
        })
    });

    debug!("Ranked {} frames", ranked.len());

    ranked
}

/// Sample distribution statistics
///
/// **Public** - returned from calculate_sample_distribution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleDistribution {
    /// Samples in the run
    pub overall_samples: u64,

    /// Number of frames
    pub frame_count: usize,

    /// Frames without callees
    pub leaf_count: usize,

    /// Caller -> callee relations
    pub edge_count: usize,

    /// Frame with the most self samples
    pub hottest_frame: Option<(FrameId, String, u64)>,

    /// Self samples of the hottest 10% of frames
    pub top_10_percent_self_samples: u64,

    /// Share of all samples in the hottest 10%
    pub top_10_percent_percentage: f64,
}

/// Summarize how samples spread across frames
pub fn calculate_sample_distribution(profile: &Profile) -> SampleDistribution {
    if profile.is_empty() {
        return SampleDistribution {
            overall_samples: profile.overall_samples,
            ..Default::default()
        };
    }

    let ranked = rank_frames(profile, TieBreak::default());
    let frame_count = ranked.len();

    let leaf_count = ranked
        .iter()
        .filter(|(_, frame)| frame.edges().next().is_none())
        .count();
    let edge_count = ranked.iter().map(|(_, frame)| frame.edges().count()).sum();

    let hottest_frame = ranked
        .first()
        .map(|(id, frame)| (*id, frame.name.clone(), frame.self_samples));

    let top_count = (frame_count as f64 * 0.1).ceil() as usize;
    let top_10_percent_self_samples: u64 = ranked
        .iter()
        .take(top_count)
        .map(|(_, frame)| frame.self_samples)
        .sum();

    SampleDistribution {
        overall_samples: profile.overall_samples,
        frame_count,
        leaf_count,
        edge_count,
        hottest_frame,
        top_10_percent_self_samples,
        top_10_percent_percentage: if profile.overall_samples > 0 {
            (top_10_percent_self_samples as f64 / profile.overall_samples as f64) * 100.0
        } else {
            0.0
        },
    }
}

impl SampleDistribution {
    /// Check if the top 10% of frames hold more than 80% of samples
    pub fn is_highly_concentrated(&self) -> bool {
        self.top_10_percent_percentage > 80.0
    }

    /// Human-readable one-liner for logging
    pub fn summary(&self) -> String {
        let hottest = self
            .hottest_frame
            .as_ref()
            .map(|(_, name, samples)| format!("{} ({})", name, samples))
            .unwrap_or_else(|| "-".to_string());

        format!(
            "Samples: {} | Frames: {} | Leaves: {} | Edges: {} | Hottest: {} | Top 10%: {:.1}%",
            self.overall_samples,
            self.frame_count,
            self.leaf_count,
            self.edge_count,
            hottest,
            self.top_10_percent_percentage
        )
    }
}
