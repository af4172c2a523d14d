//! Aggregation of captured stacks into profiles, and profile metrics.
//!
//! This module transforms sampled call stacks into:
//! - A finished `Profile` (per-frame, per-edge and per-line counts)
//! - A ranked frame ordering (hottest first)
//! - Sample distribution statistics

pub mod metrics;
pub mod stack_builder;

// Re-export main types and functions
pub use metrics::{calculate_sample_distribution, rank_frames, SampleDistribution, TieBreak};
pub use stack_builder::{parse_collapsed, CollapsedStack, ProfileBuilder, StackEntry};
