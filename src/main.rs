//! Frameprof CLI
//!
//! Renders tables, call graphs and annotated source listings from
//! sampling profiler output.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use frameprof::commands::{
    display_schema, display_version, execute_build, execute_report, validate_args,
    validate_profile_file, BuildArgs, NameMatch, ReportArgs, ReportKind,
};
use frameprof::profile::SamplingMode;
use frameprof::report::{ReportConfig, Rounding, TieBreak};
use frameprof::utils::config::{DEFAULT_INTERVAL_USEC, DEFAULT_SOURCE_WINDOW};
use std::path::PathBuf;

/// Frameprof - reports for sampling profiler runs
#[derive(Parser, Debug)]
#[command(name = "frameprof")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by the report commands
#[derive(clap::Args, Debug)]
struct ReportOptions {
    /// Path to profile JSON file
    #[arg(short, long)]
    file: PathBuf,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Percentage rounding
    #[arg(long, value_enum, default_value_t = RoundingArg::HalfUp)]
    rounding: RoundingArg,

    /// Order of frames with equal self samples
    #[arg(long, value_enum, default_value_t = TieBreakArg::Asc)]
    tie_break: TieBreakArg,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RoundingArg {
    HalfUp,
    HalfEven,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TieBreakArg {
    /// Lower frame id first
    Asc,
    /// Higher frame id first
    Desc,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Cpu,
    Wall,
    ObjectAllocation,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the ranked total/self sample table
    Table {
        #[command(flatten)]
        options: ReportOptions,
    },

    /// Print a graphviz digraph of the call graph
    Graph {
        #[command(flatten)]
        options: ReportOptions,
    },

    /// Print source listings annotated with per-line samples
    Source {
        #[command(flatten)]
        options: ReportOptions,

        /// Frame name (or fragment of it) to annotate
        #[arg(short, long)]
        method: String,

        /// Match the whole frame name
        #[arg(long, conflicts_with = "pattern")]
        exact: bool,

        /// Treat the method as a regular expression, e.g. 'pow|newobj'
        #[arg(long)]
        pattern: bool,

        /// Lines shown past the first line of frames without line samples
        #[arg(long, default_value_t = DEFAULT_SOURCE_WINDOW)]
        window: u32,
    },

    /// Print the raw profile structure
    Dump {
        #[command(flatten)]
        options: ReportOptions,
    },

    /// Build a profile JSON from collapsed stacks
    Build {
        /// Collapsed stacks file (`root;child;leaf COUNT` per line)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for profile JSON
        #[arg(short, long, default_value = "profile.json")]
        output: PathBuf,

        /// Sampling mode the stacks were captured with
        #[arg(long, value_enum, default_value_t = ModeArg::Cpu)]
        mode: ModeArg,

        /// Timer interval in microseconds, or allocations per sample
        #[arg(long, default_value_t = DEFAULT_INTERVAL_USEC)]
        interval: u64,
    },

    /// Validate a profile JSON file
    Validate {
        /// Path to profile JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Table { options } => run_report(options, ReportKind::Table, None)?,
        Commands::Graph { options } => run_report(options, ReportKind::Graph, None)?,
        Commands::Dump { options } => run_report(options, ReportKind::Dump, None)?,
        Commands::Source {
            options,
            method,
            exact,
            pattern,
            window,
        } => {
            let matching = if pattern {
                NameMatch::Pattern
            } else if exact {
                NameMatch::Exact
            } else {
                NameMatch::Contains
            };
            run_report(options, ReportKind::Source { method, matching }, Some(window))?
        }

        Commands::Build {
            input,
            output,
            mode,
            interval,
        } => {
            let mode = match mode {
                ModeArg::Cpu => SamplingMode::Cpu { interval },
                ModeArg::Wall => SamplingMode::Wall { interval },
                ModeArg::ObjectAllocation => SamplingMode::ObjectAllocation { every: interval },
            };
            execute_build(BuildArgs {
                input,
                output,
                mode,
            })?;
        }

        Commands::Validate { file } => {
            validate_profile_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Build report args from CLI options, validate them and run the report
///
/// **Private** - shared by the report subcommands
fn run_report(options: ReportOptions, kind: ReportKind, window: Option<u32>) -> Result<()> {
    let rounding = match options.rounding {
        RoundingArg::HalfUp => Rounding::HalfUp,
        RoundingArg::HalfEven => Rounding::HalfEven,
    };
    let tie_break = match options.tie_break {
        TieBreakArg::Asc => TieBreak::IdAscending,
        TieBreakArg::Desc => TieBreak::IdDescending,
    };

    let mut config = ReportConfig::new()
        .with_rounding(rounding)
        .with_tie_break(tie_break);
    if let Some(window) = window {
        config = config.with_source_window(window);
    }

    let args = ReportArgs {
        input: options.file,
        output: options.output,
        kind,
        config,
    };

    // Validate args first
    validate_args(&args)?;

    execute_report(args)
}
