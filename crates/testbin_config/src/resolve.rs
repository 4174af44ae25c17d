//! Tool resolution: turning configuration into concrete command lines.

use std::path::Path;

use tracing::{debug, warn};

use crate::cmake_cache::CMakeCache;
use crate::types::{CommandLine, SchedulerConfig};

/// CMake cache entry naming the generator's build program.
const MAKE_PROGRAM_KEY: &str = "CMAKE_MAKE_PROGRAM";

/// Build program used when neither the configuration nor the CMake cache
/// names one.
const FALLBACK_BUILD_PROGRAM: &str = "ninja";

/// Build and test commands ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTools {
    /// Build command; the target name is appended per invocation.
    pub build: CommandLine,
    /// Test-listing command; the test name filter is appended per invocation.
    pub test: CommandLine,
    /// Output substring that turns a failing run into a timeout.
    pub timeout_marker: String,
}

/// Resolves the build and test commands for a build directory.
///
/// An explicitly configured build command wins. Otherwise the build program
/// is read from `<build_dir>/CMakeCache.txt` and run with `-j1` so each
/// measurement compiles exactly one target serially. An unreadable CMake
/// cache falls back to `ninja`.
pub fn resolve_tools(config: &SchedulerConfig, build_dir: &Path) -> ResolvedTools {
    let build = match &config.tools.build {
        Some(cmd) => cmd.clone(),
        None => {
            let program = discover_build_program(build_dir)
                .unwrap_or_else(|| FALLBACK_BUILD_PROGRAM.to_string());
            CommandLine::from_args([program, "-j1".to_string()])
        }
    };
    debug!(build = ?build.0, test = ?config.tools.test.0, "resolved tools");

    ResolvedTools {
        build,
        test: config.tools.test.clone(),
        timeout_marker: config.tools.timeout_marker.clone(),
    }
}

fn discover_build_program(build_dir: &Path) -> Option<String> {
    let path = build_dir.join("CMakeCache.txt");
    if !path.is_file() {
        return None;
    }
    match CMakeCache::load(&path) {
        Ok(cache) => cache
            .get(MAKE_PROGRAM_KEY)
            .filter(|p| !p.is_empty())
            .map(str::to_string),
        Err(e) => {
            warn!(error = %e, "ignoring unreadable CMake cache");
            None
        }
    }
}
