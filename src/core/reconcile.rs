//! Namespace reconciliation.

use std::collections::BTreeSet;

use crate::core::domain::NamespaceChanges;

/// Compare the namespaces known remotely with those discovered locally.
///
/// Local-only namespaces go to `to_add`, remote-only ones to `to_remove`.
/// Both lists are sorted and free of duplicates.
pub fn compare_namespace_sets<R, L>(remote: R, local: L) -> NamespaceChanges
where
    R: IntoIterator,
    R::Item: AsRef<str>,
    L: IntoIterator,
    L::Item: AsRef<str>,
{
    let remote: BTreeSet<String> = remote.into_iter().map(|s| s.as_ref().to_string()).collect();
    let local: BTreeSet<String> = local.into_iter().map(|s| s.as_ref().to_string()).collect();

    NamespaceChanges {
        to_add: local.difference(&remote).cloned().collect(),
        to_remove: remote.difference(&local).cloned().collect(),
    }
}
