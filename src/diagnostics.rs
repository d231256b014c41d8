// ABOUTME: Diagnostics accumulator for non-fatal warnings during reconciliation.
// ABOUTME: Thread-safe so concurrent node tasks can record warnings.

use parking_lot::Mutex;

/// Collects non-fatal warnings during reconciliation operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Mutex<Vec<Warning>>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.lock().push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.lock().clone()
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.lock().is_empty()
    }
}

/// A non-fatal warning collected during reconciliation.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a warning for a join skipped because the node already
    /// belongs to a swarm.
    pub fn rejoin_skipped(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::RejoinSkipped,
            message: message.into(),
        }
    }

    /// Create a lock release warning.
    pub fn lock_release(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LockRelease,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Join skipped because the node already belongs to a swarm.
    RejoinSkipped,
    /// Failed to release the reconcile lock (lock file may remain).
    LockRelease,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn diagnostics_collects_warnings() {
        let diag = Diagnostics::default();

        diag.warn(Warning::rejoin_skipped("node already joined"));
        diag.warn(Warning::lock_release("failed to remove lock file"));

        assert!(diag.has_warnings());
        assert_eq!(diag.warnings().len(), 2);
    }

    #[test]
    fn warning_constructors_set_correct_kind() {
        let rejoin = Warning::rejoin_skipped("test");
        assert_eq!(rejoin.kind, WarningKind::RejoinSkipped);

        let lock = Warning::lock_release("test");
        assert_eq!(lock.kind, WarningKind::LockRelease);
    }
}
