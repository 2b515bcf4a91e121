//! Diff type.
//!
//! Represents the comparison between a local secret file and the secrets
//! stored remotely for the same namespace.

use std::collections::HashMap;

use crate::core::domain::{ChangeSummary, Secret, Secrets};

/// The three-way partition between a local and a remote secret set.
///
/// Every key of either side lands in at most one partition; keys whose
/// values match are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Present locally, absent remotely.
    pub added: Vec<Secret>,
    /// Present on both sides with different values. Holds the local value.
    pub updated: Vec<Secret>,
    /// Present remotely, absent locally. Holds the remote value.
    pub deleted: Vec<Secret>,
}

impl Diff {
    /// Compute the diff between a local set and a remote set.
    ///
    /// Partitions follow the order of the side each key was taken from. A
    /// key repeated within one side is reported once, at its last
    /// occurrence, with its last value.
    pub fn compute(local: &Secrets, remote: &Secrets) -> Self {
        let local_map = local.to_map();
        let remote_map = remote.to_map();

        let mut diff = Diff::default();

        for secret in last_occurrences(local) {
            match remote_map.get(secret.key()) {
                None => diff.added.push(secret.clone()),
                Some(value) if value != secret.value() => diff.updated.push(secret.clone()),
                Some(_) => {}
            }
        }

        for secret in last_occurrences(remote) {
            if !local_map.contains_key(secret.key()) {
                diff.deleted.push(secret.clone());
            }
        }

        diff
    }

    /// Secrets to write: updated first, then added.
    pub fn upserts(&self) -> Vec<Secret> {
        self.updated
            .iter()
            .chain(self.added.iter())
            .cloned()
            .collect()
    }

    /// Key-only summary of this diff for reporting.
    pub fn summary(&self, namespace: &str) -> ChangeSummary {
        fn keys(secrets: &[Secret]) -> Vec<String> {
            secrets.iter().map(|s| s.key().to_string()).collect()
        }

        ChangeSummary {
            namespace: namespace.to_string(),
            added: keys(&self.added),
            updated: keys(&self.updated),
            deleted: keys(&self.deleted),
        }
    }

    /// Whether both sides are already in sync.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    /// Total number of changed keys.
    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.deleted.len()
    }
}

/// Secrets of a set in order, keeping only the last occurrence of each key.
fn last_occurrences(secrets: &Secrets) -> impl Iterator<Item = &Secret> {
    let last: HashMap<&str, usize> = secrets
        .iter()
        .enumerate()
        .map(|(i, s)| (s.key(), i))
        .collect();

    secrets
        .iter()
        .enumerate()
        .filter(move |(i, s)| last.get(s.key()) == Some(i))
        .map(|(_, s)| s)
}
