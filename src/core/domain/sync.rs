use crate::core::domain::{ChangeSummary, NamespaceChanges};

/// Result of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// One summary per processed namespace, in processing order
    pub namespaces: Vec<ChangeSummary>,
    /// Namespace reconciliation; `None` when the run was filtered
    pub namespace_changes: Option<NamespaceChanges>,
    /// Whether writes were suppressed
    pub dry_run: bool,
}

impl SyncReport {
    /// Whether every processed namespace was already in sync.
    pub fn was_synced(&self) -> bool {
        self.namespaces.iter().all(ChangeSummary::is_empty)
    }

    /// Total number of changed keys across namespaces.
    pub fn changed_keys(&self) -> usize {
        self.namespaces
            .iter()
            .map(|s| s.upserts() + s.deleted.len())
            .sum()
    }
}
