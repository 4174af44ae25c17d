//! Measuring compile and test-run durations of individual targets.
//!
//! [`Toolchain`] is the seam between scheduling and the outside world.
//! [`ProcessToolchain`] runs the configured build and test programs in the
//! build directory and times them; tests substitute their own implementation.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Instant;

use testbin_common::{Seconds, TestGroup};
use testbin_config::{CommandLine, ResolvedTools};
use tracing::{debug, warn};

use crate::error::SchedError;

/// Exit code of the `timeout` utility when the time limit is hit.
const TIMEOUT_EXIT_CODE: i32 = 124;

/// Measures the cost of targets.
///
/// Implementations are shared by every worker of the pool, hence `Sync`.
pub trait Toolchain: Sync {
    /// Builds exactly one target and returns the elapsed wall-clock time.
    ///
    /// A timeout reported by the build tool is not an error: the time elapsed
    /// until the timeout is returned. Any other failure is.
    fn measure_compile(&self, target: &str) -> Result<Seconds, SchedError>;

    /// Runs every test of a binary's group and returns the summed time.
    ///
    /// A timed-out test counts twice its elapsed time. Any other failure is
    /// an error.
    fn measure_tests(&self, binary: &str, group: &TestGroup) -> Result<Seconds, SchedError>;
}

/// How a finished command is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Timeout,
    Failed,
}

/// Runs the real build and test programs.
#[derive(Debug, Clone)]
pub struct ProcessToolchain {
    build_dir: PathBuf,
    tools: ResolvedTools,
}

impl ProcessToolchain {
    /// Creates a toolchain executing in `build_dir`.
    pub fn new(build_dir: &Path, tools: ResolvedTools) -> Self {
        Self {
            build_dir: build_dir.to_path_buf(),
            tools,
        }
    }

    /// Runs `command` with `arg` appended, returning its output and elapsed time.
    fn run(&self, command: &CommandLine, arg: &str) -> Result<(Output, Seconds), SchedError> {
        let program = command.program().unwrap_or_default();
        let start = Instant::now();
        let output = Command::new(program)
            .args(command.args())
            .arg(arg)
            .current_dir(&self.build_dir)
            .output()
            .map_err(|e| SchedError::Spawn {
                program: program.to_string(),
                source: e,
            })?;
        Ok((output, start.elapsed().as_secs_f64()))
    }

    fn classify(&self, output: &Output) -> Outcome {
        if output.status.success() {
            return Outcome::Success;
        }
        let marker = self.tools.timeout_marker.as_str();
        let marked = !marker.is_empty()
            && (String::from_utf8_lossy(&output.stdout).contains(marker)
                || String::from_utf8_lossy(&output.stderr).contains(marker));
        if marked || output.status.code() == Some(TIMEOUT_EXIT_CODE) {
            Outcome::Timeout
        } else {
            Outcome::Failed
        }
    }
}

fn command_failed(command: &CommandLine, arg: &str, output: Output) -> SchedError {
    let mut parts = command.0.clone();
    parts.push(arg.to_string());
    SchedError::CommandFailed {
        command: parts.join(" "),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

impl Toolchain for ProcessToolchain {
    fn measure_compile(&self, target: &str) -> Result<Seconds, SchedError> {
        let (output, elapsed) = self.run(&self.tools.build, target)?;
        match self.classify(&output) {
            Outcome::Success => {
                debug!(name = target, elapsed, "compiled");
                Ok(elapsed)
            }
            Outcome::Timeout => {
                warn!(name = target, elapsed, "timeout in compile");
                Ok(elapsed)
            }
            Outcome::Failed => Err(command_failed(&self.tools.build, target, output)),
        }
    }

    fn measure_tests(&self, binary: &str, group: &TestGroup) -> Result<Seconds, SchedError> {
        let mut total = 0.0;
        for test in group.names() {
            let (output, elapsed) = self.run(&self.tools.test, test)?;
            match self.classify(&output) {
                Outcome::Success => total += elapsed,
                Outcome::Timeout => {
                    warn!(test, binary, elapsed, "timeout in test, counting it twice");
                    total += 2.0 * elapsed;
                }
                Outcome::Failed => return Err(command_failed(&self.tools.test, test, output)),
            }
        }
        debug!(binary, total, "ran tests");
        Ok(total)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    /// A toolchain whose "programs" are shell snippets; the appended
    /// argument is visible to the snippet as `$0`.
    fn shell_toolchain(dir: &Path, build: &str, test: &str) -> ProcessToolchain {
        ProcessToolchain::new(
            dir,
            ResolvedTools {
                build: CommandLine::from_args(["sh", "-c", build]),
                test: CommandLine::from_args(["sh", "-c", test]),
                timeout_marker: "Timeout".to_string(),
            },
        )
    }

    #[test]
    fn successful_compile_is_timed() {
        let dir = tempfile::tempdir().unwrap();
        let tc = shell_toolchain(dir.path(), "touch \"$0\"", "true");
        let elapsed = tc.measure_compile("artifact").unwrap();
        assert!(elapsed >= 0.0);
        assert!(dir.path().join("artifact").exists());
    }

    #[test]
    fn compile_timeout_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let tc = shell_toolchain(dir.path(), "echo 'Timeout reached'; exit 1", "true");
        assert!(tc.measure_compile("a").is_ok());
    }

    #[test]
    fn timeout_exit_code_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let tc = shell_toolchain(dir.path(), "exit 124", "true");
        assert!(tc.measure_compile("a").is_ok());
    }

    #[test]
    fn compile_timeout_records_elapsed_time() {
        let dir = tempfile::tempdir().unwrap();
        let tc = shell_toolchain(dir.path(), "sleep 0.3; echo Timeout; exit 8", "true");
        let elapsed = tc.measure_compile("a").unwrap();
        assert!(elapsed >= 0.3, "elapsed {elapsed}");
    }

    #[test]
    fn test_timeout_counts_twice() {
        let dir = tempfile::tempdir().unwrap();
        let tc = shell_toolchain(dir.path(), "true", "sleep 0.3; echo Timeout; exit 8");
        let total = tc.measure_tests("bin", &TestGroup::new("slow")).unwrap();
        assert!(total >= 0.6, "total {total}");
    }

    #[test]
    fn test_timeout_exit_code_counts_twice() {
        let dir = tempfile::tempdir().unwrap();
        let tc = shell_toolchain(dir.path(), "true", "sleep 0.3; exit 124");
        let total = tc.measure_tests("bin", &TestGroup::new("slow")).unwrap();
        assert!(total >= 0.6, "total {total}");
    }

    #[test]
    fn compile_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let tc = shell_toolchain(dir.path(), "echo 'error: boom' >&2; exit 3", "true");
        match tc.measure_compile("a").unwrap_err() {
            SchedError::CommandFailed {
                command,
                exit_code,
                stderr,
                ..
            } => {
                assert!(command.ends_with(" a"));
                assert_eq!(exit_code, Some(3));
                assert!(stderr.contains("boom"));
            }
            other => panic!("expected command failure, got {other:?}"),
        }
    }

    #[test]
    fn every_test_in_group_is_run() {
        let dir = tempfile::tempdir().unwrap();
        let tc = shell_toolchain(dir.path(), "true", "touch \"ran_$0\"");
        tc.measure_tests("bin", &TestGroup::new("t1;t2")).unwrap();
        assert!(dir.path().join("ran_t1").exists());
        assert!(dir.path().join("ran_t2").exists());
    }

    #[test]
    fn test_timeout_continues_with_next_test() {
        let dir = tempfile::tempdir().unwrap();
        let tc = shell_toolchain(
            dir.path(),
            "true",
            "touch \"ran_$0\"; [ \"$0\" = slow ] && { echo Timeout; exit 8; }; exit 0",
        );
        tc.measure_tests("bin", &TestGroup::new("slow;fast")).unwrap();
        assert!(dir.path().join("ran_fast").exists());
    }

    #[test]
    fn test_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let tc = shell_toolchain(dir.path(), "true", "exit 2");
        let err = tc.measure_tests("bin", &TestGroup::new("t1")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let tc = ProcessToolchain::new(
            dir.path(),
            ResolvedTools {
                build: CommandLine::from_args(["definitely-not-a-real-program-xyz"]),
                test: CommandLine::from_args(["true"]),
                timeout_marker: "Timeout".to_string(),
            },
        );
        assert!(matches!(
            tc.measure_compile("a").unwrap_err(),
            SchedError::Spawn { .. }
        ));
    }
}
