//! Configuration file loading and validation.

use std::path::Path;

use tracing::debug;

use crate::error::ConfigError;
use crate::types::SchedulerConfig;

/// Name of the configuration file looked up in the cache directory.
pub const CONFIG_FILE: &str = "testbin.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<SchedulerConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<SchedulerConfig, ConfigError> {
    let config: SchedulerConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Resolves the configuration for a run.
///
/// An explicitly given file must exist. Otherwise `<cache_dir>/testbin.toml`
/// is used when present, and the built-in defaults when not.
pub fn load_or_default(
    explicit: Option<&Path>,
    cache_dir: &Path,
) -> Result<SchedulerConfig, ConfigError> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading configuration");
        return load_config(path);
    }
    let implicit = cache_dir.join(CONFIG_FILE);
    if implicit.is_file() {
        debug!(path = %implicit.display(), "loading configuration");
        return load_config(&implicit);
    }
    debug!("no configuration file, using defaults");
    Ok(SchedulerConfig::default())
}

/// Validates that configuration values are usable.
fn validate_config(config: &SchedulerConfig) -> Result<(), ConfigError> {
    if config.schedule.bin_count == 0 {
        return Err(ConfigError::ValidationError(
            "schedule.bin_count must be positive".to_string(),
        ));
    }
    if config.schedule.max_time.is_nan() || config.schedule.max_time <= 0.0 {
        return Err(ConfigError::ValidationError(
            "schedule.max_time must be positive".to_string(),
        ));
    }
    if config.tools.build.as_ref().is_some_and(|c| c.is_empty()) {
        return Err(ConfigError::ValidationError(
            "tools.build must name a program".to_string(),
        ));
    }
    if config.tools.test.is_empty() {
        return Err(ConfigError::ValidationError(
            "tools.test must name a program".to_string(),
        ));
    }
    if config.inputs.list_separator.is_empty() || config.inputs.group_separator.is_empty() {
        return Err(ConfigError::ValidationError(
            "input separators must not be empty".to_string(),
        ));
    }
    if config.inputs.fragment_name.is_empty() {
        return Err(ConfigError::ValidationError(
            "inputs.fragment_name must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BinPolicy, DEFAULT_BIN_COUNT};

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert!(config.tools.build.is_none());
        assert_eq!(config.tools.test.program(), Some("ctest"));
        assert_eq!(config.tools.timeout_marker, "Timeout");
        assert_eq!(config.schedule.bin_count, DEFAULT_BIN_COUNT);
        assert_eq!(config.schedule.policy, BinPolicy::ConstantBinCount);
        assert_eq!(config.schedule.workers, 0);
        assert_eq!(config.inputs.list_separator, ";");
        assert_eq!(config.inputs.group_separator, "/");
        assert_eq!(config.inputs.fragment_name, "builder_definitions.cmake");
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[tools]
build = ["make", "-j1"]
test = ["ctest", "-j1", "-R"]
timeout_marker = "timed out"

[schedule]
bin_count = 4
max_time = 600.0
policy = "constant-volume"
workers = 1

[inputs]
list_separator = ","
group_separator = "|"
fragment_name = "bins.cmake"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.tools.build.unwrap().program(), Some("make"));
        assert_eq!(config.tools.timeout_marker, "timed out");
        assert_eq!(config.schedule.bin_count, 4);
        assert_eq!(config.schedule.max_time, 600.0);
        assert_eq!(config.schedule.policy, BinPolicy::ConstantVolume);
        assert_eq!(config.schedule.workers, 1);
        assert_eq!(config.inputs.list_separator, ",");
        assert_eq!(config.inputs.fragment_name, "bins.cmake");
    }

    #[test]
    fn zero_bin_count_errors() {
        let err = load_config_from_str("[schedule]\nbin_count = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn negative_budget_errors() {
        let err = load_config_from_str("[schedule]\nmax_time = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_build_command_errors() {
        let err = load_config_from_str("[tools]\nbuild = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_separator_errors() {
        let err = load_config_from_str("[inputs]\nlist_separator = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_policy_errors() {
        let err = load_config_from_str("[schedule]\npolicy = \"random\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_or_default_prefers_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("custom.toml");
        std::fs::write(&explicit, "[schedule]\nbin_count = 3\n").unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[schedule]\nbin_count = 5\n").unwrap();
        let config = load_or_default(Some(explicit.as_path()), dir.path()).unwrap();
        assert_eq!(config.schedule.bin_count, 3);
    }

    #[test]
    fn load_or_default_finds_cache_dir_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[schedule]\nbin_count = 5\n").unwrap();
        let config = load_or_default(None, dir.path()).unwrap();
        assert_eq!(config.schedule.bin_count, 5);
    }

    #[test]
    fn load_or_default_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(None, dir.path()).unwrap();
        assert_eq!(config.schedule.bin_count, DEFAULT_BIN_COUNT);
    }

    #[test]
    fn missing_explicit_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.toml");
        let err = load_or_default(Some(absent.as_path()), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
