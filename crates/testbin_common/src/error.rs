//! Errors raised while assembling a workload from user input.

/// An inconsistency in the lists of binaries, test groups, and header libraries.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The number of test groups does not match the number of binaries.
    #[error("{groups} test group(s) given for {binaries} binary target(s)")]
    MisalignedGroups {
        /// Number of binary targets.
        binaries: usize,
        /// Number of test groups.
        groups: usize,
    },

    /// A target name appears more than once across binaries and header libraries.
    #[error("duplicate target '{0}'")]
    DuplicateTarget(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_misaligned() {
        let err = InputError::MisalignedGroups {
            binaries: 3,
            groups: 2,
        };
        assert_eq!(format!("{err}"), "2 test group(s) given for 3 binary target(s)");
    }

    #[test]
    fn display_duplicate() {
        let err = InputError::DuplicateTarget("test_a".to_string());
        assert_eq!(format!("{err}"), "duplicate target 'test_a'");
    }
}
