//! Configuration and constants shared by the library and the CLI.

/// Current profile schema version
pub const SCHEMA_VERSION: &str = "1.0";

/// Lines shown past a frame's first line when it has no per-line samples
pub const DEFAULT_SOURCE_WINDOW: u32 = 5;

// Graph styling. Node weight = NODE_BASE_WEIGHT + WEIGHT_SCALE * self/overall,
// edge weight = EDGE_BASE_WEIGHT + WEIGHT_SCALE * edge/overall.
pub const NODE_BASE_WEIGHT: f64 = 10.0;
pub const EDGE_BASE_WEIGHT: f64 = 1.0;
pub const WEIGHT_SCALE: f64 = 28.0;

/// Name given to frames that were sampled but never registered
pub const UNKNOWN_FRAME_NAME: &str = "<unknown>";

/// Default sampling interval (microseconds) for timer-driven modes
pub const DEFAULT_INTERVAL_USEC: u64 = 1000;
