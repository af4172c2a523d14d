//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod build;
pub mod models;
pub mod report;
pub mod utils;

// Re-export main command functions
pub use build::execute_build;
pub use models::{BuildArgs, NameMatch, ReportArgs, ReportKind};
pub use report::{execute_report, render_report, validate_args};
pub use utils::{display_schema, display_version, validate_profile_file};
