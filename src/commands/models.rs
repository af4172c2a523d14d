//! Argument types shared by the CLI and the command implementations.

use crate::profile::SamplingMode;
use crate::report::{NameFilter, ReportConfig};
use std::path::PathBuf;

/// How the source report compares `method` against frame names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatch {
    /// Name contains `method`
    #[default]
    Contains,

    /// Name equals `method`
    Exact,

    /// Name matches the regular expression `method`
    Pattern,
}

impl NameMatch {
    /// Build the frame filter for `method`
    pub fn filter(self, method: &str) -> Result<NameFilter, regex::Error> {
        match self {
            NameMatch::Contains => Ok(NameFilter::containing(method)),
            NameMatch::Exact => Ok(NameFilter::exact(method)),
            NameMatch::Pattern => NameFilter::pattern(method),
        }
    }
}

/// Which projection of the profile to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    /// Ranked total/self table
    Table,

    /// Graphviz digraph
    Graph,

    /// Annotated source for frames whose name matches `method`
    Source { method: String, matching: NameMatch },

    /// Raw JSON dump
    Dump,
}

impl ReportKind {
    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::Table => "table",
            ReportKind::Graph => "graph",
            ReportKind::Source { .. } => "source",
            ReportKind::Dump => "dump",
        }
    }
}

/// Arguments for the report commands
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Profile JSON to read
    pub input: PathBuf,

    /// Write the report here instead of stdout
    pub output: Option<PathBuf>,

    pub kind: ReportKind,

    /// Rounding, tie-break and window settings
    pub config: ReportConfig,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("profile.json"),
            output: None,
            kind: ReportKind::Table,
            config: ReportConfig::default(),
        }
    }
}

/// Arguments for the build command
#[derive(Debug, Clone)]
pub struct BuildArgs {
    /// Collapsed stacks text file
    pub input: PathBuf,

    /// Profile JSON to write
    pub output: PathBuf,

    /// Sampling mode recorded in the profile
    pub mode: SamplingMode,
}

impl Default for BuildArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("stacks.txt"),
            output: PathBuf::from("profile.json"),
            mode: SamplingMode::Cpu { interval: 1000 },
        }
    }
}
