//! Error types for scheduling runs.

use std::path::PathBuf;

use testbin_cache::CacheError;

/// Errors that abort a scheduling run.
#[derive(Debug, thiserror::Error)]
pub enum SchedError {
    /// An external program could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// The program that was executed.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A build or test command failed for a reason other than a timeout.
    #[error("'{command}' failed with {}", describe_exit(.exit_code))]
    CommandFailed {
        /// The full command line.
        command: String,
        /// Exit code, or `None` if the process was killed by a signal.
        exit_code: Option<i32>,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// A timing that should have been measured is absent.
    #[error("no timing recorded for '{0}'")]
    MissingTiming(String),

    /// The worker pool could not be created.
    #[error("failed to start worker pool: {0}")]
    Pool(String),

    /// A timing record could not be persisted.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The output fragment could not be written.
    #[error("failed to write {path}: {source}")]
    Output {
        /// The fragment path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl SchedError {
    /// Process exit code to report for this error.
    ///
    /// A failed command propagates its own exit code; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            SchedError::CommandFailed {
                exit_code: Some(code),
                ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}
