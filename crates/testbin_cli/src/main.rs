//! testbin: distributes test binaries across parallel CI workers.
//!
//! Measures compile and test-run times of every target in a CMake build
//! directory, packs the totals into balanced bins, and writes a CMake
//! fragment assigning each test a `builder_<n>` label.

#![warn(missing_docs)]

mod schedule;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, ValueEnum};
use testbin_sched::SchedError;
use tracing_subscriber::EnvFilter;

/// Balance test binaries across CI workers by measured cost.
#[derive(Parser, Debug)]
#[command(name = "testbin", version, about = "Timing-based test bin scheduler")]
pub struct Cli {
    /// Suppress all output except warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored log output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `testbin.toml` configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of parallel measurement workers (default: all CPUs).
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// The scheduling inputs.
    #[command(flatten)]
    pub schedule: ScheduleArgs,
}

/// Positional inputs of a scheduling run.
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Build directory in which build and test commands run.
    pub build_dir: PathBuf,

    /// Directory holding the timing records and the emitted CMake fragment.
    pub cache_dir: PathBuf,

    /// File with the `;`-joined binary target names.
    pub binaries: PathBuf,

    /// File with the `/`-joined per-binary test groups.
    pub testnames: PathBuf,

    /// File with the `;`-joined header-only library target names.
    pub headerlibs: PathBuf,

    /// Desired number of bins (default 13 when missing or not a number).
    pub bin_count: Option<String>,

    /// Packing policy, overriding the configuration file.
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
}

/// Packing policy selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// A fixed number of bins, greedily balanced.
    ConstantBinCount,
    /// Bins capped at the per-worker wall-clock budget.
    ConstantVolume,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
    /// Forced worker count.
    pub jobs: Option<usize>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
        jobs: cli.jobs,
    };
    init_logging(&global);

    match schedule::run(&cli.schedule, &global) {
        Ok(code) => process::exit(code),
        Err(e) => {
            if let Some(SchedError::CommandFailed { stdout, stderr, .. }) =
                e.downcast_ref::<SchedError>()
            {
                let rule = "*".repeat(79);
                eprintln!("{rule}");
                eprintln!("{stdout}");
                eprintln!("{stderr}");
                eprintln!("{rule}");
            }
            eprintln!("error: {e}");
            let code = e
                .downcast_ref::<SchedError>()
                .map_or(1, SchedError::exit_code);
            process::exit(code);
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the level chosen
/// by `--quiet` / `--verbose`.
fn init_logging(global: &GlobalArgs) {
    let level = if global.quiet {
        "warn"
    } else if global.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .init();
}
