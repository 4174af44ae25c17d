//! The scheduling run: read inputs, collect timings, pack, emit.
//!
//! 1. Load configuration (explicit file, `<cache_dir>/testbin.toml`, or defaults)
//! 2. Read the binary, test-group and header-library lists
//! 3. Bring compile and test-run timings up to date
//! 4. Pack totals into bins and print volume statistics
//! 5. Write the CMake fragment next to the records, where CMake includes it

use std::error::Error;
use std::path::Path;

use testbin_cache::RecordStore;
use testbin_common::{split_groups, split_list, Workload};
use testbin_config::{load_or_default, resolve_tools, BinPolicy, InputsConfig};
use testbin_sched::{pack, write_fragment, BinStats, ProcessToolchain, TimingCollector, WorkerPool};
use tracing::{info, warn};

use crate::{GlobalArgs, PolicyArg, ScheduleArgs};

/// Runs a full scheduling pass. Returns the process exit code.
pub fn run(args: &ScheduleArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_or_default(global.config.as_deref(), &args.cache_dir)?;
    let workload = read_workload(args, &config.inputs)?;

    let bin_count = resolve_bin_count(args.bin_count.as_deref(), config.schedule.bin_count);
    let policy = args
        .policy
        .map(BinPolicy::from)
        .unwrap_or(config.schedule.policy);
    let workers = global.jobs.unwrap_or(config.schedule.workers);
    info!(
        binaries = workload.binaries().len(),
        header_libs = workload.header_libs().len(),
        bin_count,
        ?policy,
        "scheduling"
    );

    let tools = resolve_tools(&config, &args.build_dir);
    let toolchain = ProcessToolchain::new(&args.build_dir, tools);
    let store = RecordStore::new(&args.cache_dir);
    let totals = TimingCollector::new(&store, &toolchain, WorkerPool::new(workers))
        .compute_totals(&workload)?;

    let bins = pack(&totals, policy, bin_count, config.schedule.max_time);
    if !global.quiet {
        println!("{}", BinStats::compute(&bins, config.schedule.max_time));
    }

    let fragment = args.cache_dir.join(&config.inputs.fragment_name);
    write_fragment(&fragment, &bins, &workload)?;
    Ok(0)
}

impl From<PolicyArg> for BinPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::ConstantBinCount => BinPolicy::ConstantBinCount,
            PolicyArg::ConstantVolume => BinPolicy::ConstantVolume,
        }
    }
}

/// Parses the positional bin count, falling back to `default` when it is
/// absent, not a number, or zero.
fn resolve_bin_count(arg: Option<&str>, default: usize) -> usize {
    match arg {
        None => default,
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                warn!(value = raw, default, "invalid bin count, using default");
                default
            }
        },
    }
}

/// Reads the three list files and assembles the workload.
fn read_workload(args: &ScheduleArgs, inputs: &InputsConfig) -> Result<Workload, Box<dyn Error>> {
    let binaries = split_list(&read_input(&args.binaries)?, &inputs.list_separator);
    let groups = split_groups(&read_input(&args.testnames)?, &inputs.group_separator);
    let header_libs = split_list(&read_input(&args.headerlibs)?, &inputs.list_separator);
    Ok(Workload::new(binaries, groups, header_libs)?)
}

fn read_input(path: &Path) -> Result<String, Box<dyn Error>> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()).into())
}
