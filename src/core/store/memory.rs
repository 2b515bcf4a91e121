//! In-memory secret store.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use super::{check_batch, SecretStore};
use crate::core::domain::{Secret, Secrets};
use crate::error::{Result, StoreError};

type Tables = BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>;

/// A write request received by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Insert { namespace: String, keys: Vec<String> },
    Delete { namespace: String, keys: Vec<String> },
}

/// Secret store held in process memory.
///
/// Records every write request so callers can inspect batching.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    requests: Mutex<Vec<Request>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one empty table.
    pub fn with_table(table: &str) -> Self {
        let store = Self::new();
        store.lock_tables().insert(table.to_string(), BTreeMap::new());
        store
    }

    /// Write requests received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_tables(&self) -> MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, request: Request) {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);
    }
}

fn keys(secrets: &[Secret]) -> Vec<String> {
    secrets.iter().map(|s| s.key().to_string()).collect()
}

impl SecretStore for MemoryStore {
    fn create_table(&self, table: &str) -> Result<()> {
        self.lock_tables().entry(table.to_string()).or_default();
        Ok(())
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.lock_tables().contains_key(table))
    }

    fn list_secrets(&self, table: &str, namespace: &str) -> Result<Secrets> {
        let tables = self.lock_tables();
        let table = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        Ok(table
            .get(namespace)
            .map(|items| Secrets::from_map(items.clone()))
            .unwrap_or_default())
    }

    fn list_namespaces(&self, table: &str) -> Result<Vec<String>> {
        let tables = self.lock_tables();
        let table = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let namespaces: BTreeSet<&String> = table
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(ns, _)| ns)
            .collect();
        Ok(namespaces.into_iter().cloned().collect())
    }

    fn insert(&self, table: &str, namespace: &str, secrets: &[Secret]) -> Result<()> {
        check_batch(secrets)?;
        self.record(Request::Insert {
            namespace: namespace.to_string(),
            keys: keys(secrets),
        });

        let mut tables = self.lock_tables();
        let items = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?
            .entry(namespace.to_string())
            .or_default();
        for secret in secrets {
            items.insert(secret.key().to_string(), secret.value().to_string());
        }
        Ok(())
    }

    fn delete(&self, table: &str, namespace: &str, secrets: &[Secret]) -> Result<()> {
        check_batch(secrets)?;
        self.record(Request::Delete {
            namespace: namespace.to_string(),
            keys: keys(secrets),
        });

        let mut tables = self.lock_tables();
        let table = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        if let Some(items) = table.get_mut(namespace) {
            for secret in secrets {
                items.remove(secret.key());
            }
            if items.is_empty() {
                table.remove(namespace);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_insert_then_list() {
        let store = MemoryStore::with_table("t");
        store
            .insert("t", "app", &[Secret::new("B", "2"), Secret::new("A", "1")])
            .unwrap();

        let secrets = store.list_secrets("t", "app").unwrap();

        assert_eq!(secrets.keys(), vec!["A", "B"]);
        assert_eq!(store.list_namespaces("t").unwrap(), vec!["app"]);
    }

    #[test]
    fn test_delete_last_key_drops_namespace() {
        let store = MemoryStore::with_table("t");
        store.insert("t", "app", &[Secret::new("A", "1")]).unwrap();
        store.delete("t", "app", &[Secret::new("A", "1")]).unwrap();

        assert!(store.list_namespaces("t").unwrap().is_empty());
        assert!(store.list_secrets("t", "app").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_oversized_batch() {
        let store = MemoryStore::with_table("t");
        let secrets: Vec<_> = (0..26).map(|i| Secret::new(format!("K{i}"), "v")).collect();

        let err = store.insert("t", "app", &secrets).unwrap_err();

        assert!(matches!(
            err,
            Error::Store(StoreError::BatchTooLarge { size: 26, limit: 25 })
        ));
        assert!(store.requests().is_empty());
    }

    #[test]
    fn test_missing_table() {
        let store = MemoryStore::new();

        assert!(!store.table_exists("t").unwrap());
        assert!(matches!(
            store.list_secrets("t", "app"),
            Err(Error::Store(StoreError::TableNotFound(_)))
        ));
    }

    #[test]
    fn test_records_requests() {
        let store = MemoryStore::with_table("t");
        store.insert("t", "app", &[Secret::new("A", "1")]).unwrap();
        store.delete("t", "app", &[Secret::new("A", "1")]).unwrap();

        assert_eq!(
            store.requests(),
            vec![
                Request::Insert {
                    namespace: "app".to_string(),
                    keys: vec!["A".to_string()],
                },
                Request::Delete {
                    namespace: "app".to_string(),
                    keys: vec!["A".to_string()],
                },
            ]
        );
    }
}
