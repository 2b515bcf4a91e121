//! Change summary type.
//!
//! A rendering-free description of what a sync changes in one namespace.

/// Keys changed in one namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub namespace: String,
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub deleted: Vec<String>,
}

impl ChangeSummary {
    /// Whether nothing changes.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    /// Number of keys written (added + updated).
    pub fn upserts(&self) -> usize {
        self.added.len() + self.updated.len()
    }
}

/// Namespaces present on only one side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceChanges {
    /// Local only; created implicitly when their secrets are written.
    pub to_add: Vec<String>,
    /// Remote only; reported, never removed by sync.
    pub to_remove: Vec<String>,
}

impl NamespaceChanges {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}
