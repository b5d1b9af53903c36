//! # Failure policies for cleanup actions.
//!
//! [`FailurePolicy`] decides what happens to the walk when an action fails.
//! The two flags are independent:
//!
//! | critical | ignore_error | recorded in outcome | halts walk |
//! |----------|--------------|---------------------|------------|
//! | false    | false        | yes                 | no         |
//! | false    | true         | no                  | no         |
//! | true     | false        | yes                 | yes        |
//! | true     | true         | no                  | yes        |
//!
//! "Halts" means that no action registered *before* the failing one runs.

/// Policy applied when a cleanup action fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FailurePolicy {
    /// Stop the walk when this action fails.
    pub critical: bool,
    /// Leave this action's failure out of the aggregate outcome.
    pub ignore_error: bool,
}

impl FailurePolicy {
    /// Failure is recorded and halts the walk.
    pub const fn critical() -> Self {
        Self {
            critical: true,
            ignore_error: false,
        }
    }

    /// Failure is neither recorded nor halting.
    pub const fn ignored() -> Self {
        Self {
            critical: false,
            ignore_error: true,
        }
    }

    /// Returns a copy with `critical` set.
    pub const fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    /// Returns a copy with `ignore_error` set.
    pub const fn with_ignore_error(mut self, ignore_error: bool) -> Self {
        self.ignore_error = ignore_error;
        self
    }

    /// Whether a failure lands in the aggregate outcome.
    #[inline]
    pub const fn records_failure(&self) -> bool {
        !self.ignore_error
    }

    /// Whether a failure stops the walk.
    #[inline]
    pub const fn halts_walk(&self) -> bool {
        self.critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_table() {
        let cases = [
            (false, false, true, false),
            (false, true, false, false),
            (true, false, true, true),
            (true, true, false, true),
        ];
        for (critical, ignore_error, recorded, halts) in cases {
            let p = FailurePolicy {
                critical,
                ignore_error,
            };
            assert_eq!(p.records_failure(), recorded, "{p:?}");
            assert_eq!(p.halts_walk(), halts, "{p:?}");
        }
    }

    #[test]
    fn test_default_records_and_continues() {
        let p = FailurePolicy::default();
        assert!(p.records_failure());
        assert!(!p.halts_walk());
    }

    #[test]
    fn test_builders_compose() {
        let p = FailurePolicy::critical().with_ignore_error(true);
        assert!(p.halts_walk());
        assert!(!p.records_failure());
        assert_eq!(FailurePolicy::ignored().with_critical(true), p);
    }
}
