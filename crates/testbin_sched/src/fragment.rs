//! Rendering the CMake fragment that wires bins into the build.
//!
//! The fragment declares the bin count as a cache variable, adds one custom
//! target per bin depending on all of the bin's targets, and labels every test
//! of every binary with its bin so CI jobs can select them with `ctest -L`.

use std::fmt;
use std::path::Path;

use testbin_common::{TargetKind, Workload};
use tracing::info;

use crate::error::SchedError;
use crate::partition::Bin;

/// Cache variable holding the number of bins.
pub const BIN_COUNT_VARIABLE: &str = "DXT_BIN_COUNT";

/// Prefix of the per-bin aggregate build targets.
pub const BUILDER_TARGET_PREFIX: &str = "test_binaries_builder_";

/// Prefix of the per-bin test labels.
pub const BUILDER_LABEL_PREFIX: &str = "builder_";

/// The fragment for a set of bins, rendered through [`fmt::Display`].
struct Fragment<'a> {
    bins: &'a [Bin],
    workload: &'a Workload,
}

impl fmt::Display for Fragment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "set({BIN_COUNT_VARIABLE} \"{}\" CACHE STRING \"number of bins for test targets\" )",
            self.bins.len()
        )?;
        for (idx, bin) in self.bins.iter().enumerate() {
            write!(f, "add_custom_target({BUILDER_TARGET_PREFIX}{idx}")?;
            if !bin.is_empty() {
                let deps: Vec<&str> = bin.targets().collect();
                write!(f, " DEPENDS {}", deps.join(" "))?;
            }
            writeln!(f, ")")?;
            for target in bin.targets() {
                if self.workload.kind_of(target) != Some(TargetKind::Binary) {
                    continue;
                }
                let Some(group) = self.workload.group_of(target) else {
                    continue;
                };
                for test in group.names() {
                    writeln!(
                        f,
                        "set_tests_properties({test} PROPERTIES LABELS \"{BUILDER_LABEL_PREFIX}{idx}\")"
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Renders the fragment text for the given bins.
pub fn render_fragment(bins: &[Bin], workload: &Workload) -> String {
    Fragment { bins, workload }.to_string()
}

/// Renders the fragment and writes it to `path`.
pub fn write_fragment(path: &Path, bins: &[Bin], workload: &Workload) -> Result<(), SchedError> {
    let text = render_fragment(bins, workload);
    std::fs::write(path, text).map_err(|e| SchedError::Output {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(path = %path.display(), bins = bins.len(), "wrote bin definitions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use testbin_common::TestGroup;

    fn workload() -> Workload {
        Workload::new(
            vec!["a".to_string(), "b".to_string()],
            vec![TestGroup::new("t1;t2"), TestGroup::new("t3")],
            vec!["h1".to_string()],
        )
        .unwrap()
    }

    fn bins() -> Vec<Bin> {
        let mut b0 = Bin::default();
        b0.push("a", 13.0);
        let mut b1 = Bin::default();
        b1.push("b", 6.0);
        b1.push("h1", 2.0);
        vec![b0, b1]
    }

    #[test]
    fn renders_count_targets_and_labels() {
        let text = render_fragment(&bins(), &workload());
        let expected = "\
set(DXT_BIN_COUNT \"2\" CACHE STRING \"number of bins for test targets\" )
add_custom_target(test_binaries_builder_0 DEPENDS a)
set_tests_properties(t1 PROPERTIES LABELS \"builder_0\")
set_tests_properties(t2 PROPERTIES LABELS \"builder_0\")
add_custom_target(test_binaries_builder_1 DEPENDS b h1)
set_tests_properties(t3 PROPERTIES LABELS \"builder_1\")
";
        assert_eq!(text, expected);
    }

    #[test]
    fn header_libs_get_no_labels() {
        let text = render_fragment(&bins(), &workload());
        assert!(!text.contains("set_tests_properties(h1"));
    }

    #[test]
    fn empty_bin_has_no_dependencies() {
        let mut all = bins();
        all.push(Bin::default());
        let text = render_fragment(&all, &workload());
        assert!(text.contains("set(DXT_BIN_COUNT \"3\""));
        assert!(text.contains("add_custom_target(test_binaries_builder_2)\n"));
    }

    #[test]
    fn write_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("builder_definitions.cmake");
        write_fragment(&path, &bins(), &workload()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("set(DXT_BIN_COUNT"));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.cmake");
        let err = write_fragment(&path, &bins(), &workload()).unwrap_err();
        assert!(matches!(err, SchedError::Output { .. }));
    }
}
