//! Configuration types deserialized from `testbin.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// Default number of bins when none is given on the command line.
pub const DEFAULT_BIN_COUNT: usize = 13;

/// Default wall-clock budget of a single CI worker, in seconds.
pub const DEFAULT_MAX_TIME: f64 = 23.0 * 60.0;

/// The top-level scheduler configuration.
///
/// Every section is optional; an empty file yields the built-in defaults.
#[derive(Debug, Default, Deserialize)]
pub struct SchedulerConfig {
    /// External build and test programs.
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Bin count, budget, packing policy and parallelism.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Separators of the input lists and the output fragment name.
    #[serde(default)]
    pub inputs: InputsConfig,
}

/// External programs whose run time is measured.
#[derive(Debug, Deserialize)]
pub struct ToolsConfig {
    /// Build command; the target name is appended. When unset, the build
    /// program is discovered from the build directory's `CMakeCache.txt`.
    #[serde(default)]
    pub build: Option<CommandLine>,
    /// Test-listing command; the test name filter is appended.
    #[serde(default = "default_test_command")]
    pub test: CommandLine,
    /// Substring in a failing command's output that marks a timeout.
    #[serde(default = "default_timeout_marker")]
    pub timeout_marker: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            build: None,
            test: default_test_command(),
            timeout_marker: default_timeout_marker(),
        }
    }
}

fn default_test_command() -> CommandLine {
    CommandLine::from_args(["ctest", "-j1", "-N", "-R"])
}

fn default_timeout_marker() -> String {
    "Timeout".to_string()
}

/// Scheduling parameters.
#[derive(Debug, Deserialize)]
pub struct ScheduleConfig {
    /// Bin count used when the command line gives none or an invalid one.
    #[serde(default = "default_bin_count")]
    pub bin_count: usize,
    /// Wall-clock budget per bin in seconds. Bin volumes are reported
    /// relative to it, and the constant-volume policy uses it as the cap.
    #[serde(default = "default_max_time")]
    pub max_time: f64,
    /// Packing policy.
    #[serde(default)]
    pub policy: BinPolicy,
    /// Number of parallel measurement workers; 0 uses every available CPU.
    #[serde(default)]
    pub workers: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            bin_count: DEFAULT_BIN_COUNT,
            max_time: DEFAULT_MAX_TIME,
            policy: BinPolicy::default(),
            workers: 0,
        }
    }
}

fn default_bin_count() -> usize {
    DEFAULT_BIN_COUNT
}

fn default_max_time() -> f64 {
    DEFAULT_MAX_TIME
}

/// How targets are packed into bins.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BinPolicy {
    /// A fixed number of bins, balanced greedily (default).
    #[default]
    ConstantBinCount,
    /// Bins capped at the wall-clock budget; the bin count follows.
    ConstantVolume,
}

/// Input list separators and output naming.
#[derive(Debug, Deserialize)]
pub struct InputsConfig {
    /// Separator of the binary and header-library lists.
    #[serde(default = "default_list_separator")]
    pub list_separator: String,
    /// Separator between per-binary test groups.
    #[serde(default = "default_group_separator")]
    pub group_separator: String,
    /// File name of the emitted CMake fragment.
    #[serde(default = "default_fragment_name")]
    pub fragment_name: String,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            list_separator: default_list_separator(),
            group_separator: default_group_separator(),
            fragment_name: default_fragment_name(),
        }
    }
}

fn default_list_separator() -> String {
    ";".to_string()
}

fn default_group_separator() -> String {
    "/".to_string()
}

fn default_fragment_name() -> String {
    "builder_definitions.cmake".to_string()
}

/// A program followed by its leading arguments.
///
/// Accepts either a list of strings (`["ninja", "-j1"]`) or a single string
/// that is split on whitespace (`"ninja -j1"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(pub Vec<String>);

impl CommandLine {
    /// Builds a command line from its parts.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(args.into_iter().map(Into::into).collect())
    }

    /// The program to execute.
    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Arguments following the program.
    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }

    /// Returns `true` if no program is given.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for CommandLine {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrVec;

        impl<'de> Visitor<'de> for StringOrVec {
            type Value = CommandLine;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("a command string or a list of strings")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(CommandLine::from_args(v.split_whitespace()))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut vec = Vec::new();
                while let Some(val) = seq.next_element::<String>()? {
                    vec.push(val);
                }
                Ok(CommandLine(vec))
            }
        }

        deserializer.deserialize_any(StringOrVec)
    }
}
