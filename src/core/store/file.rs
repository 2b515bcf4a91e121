//! File-backed secret store.
//!
//! Keeps every table in one JSON document:
//!
//! ```json
//! { "tables": { "strata": { "production/web": { "API_KEY": "AQICAH..." } } } }
//! ```
//!
//! Each call reads the document and, for writes, replaces it.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{check_batch, SecretStore};
use crate::core::domain::{Secret, Secrets};
use crate::error::{Result, StoreError};

type Items = BTreeMap<String, String>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    tables: BTreeMap<String, BTreeMap<String, Items>>,
}

/// Secret store persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open a store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn doc_error(&self, message: impl std::fmt::Display) -> StoreError {
        StoreError::Document {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }

    fn read(&self) -> std::result::Result<Document, StoreError> {
        if !self.path.exists() {
            return Ok(Document::default());
        }
        trace!(path = %self.path.display(), "reading store document");
        let contents = fs::read_to_string(&self.path).map_err(|e| self.doc_error(e))?;
        serde_json::from_str(&contents).map_err(|e| self.doc_error(e))
    }

    fn write(&self, doc: &Document) -> std::result::Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.doc_error(e))?;
        }
        let contents = serde_json::to_string_pretty(doc).map_err(|e| self.doc_error(e))?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Owner-only from creation (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(|e| self.doc_error(e))?;

        // A document created before may be wider; narrow it before writing.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| self.doc_error(e))?;
        }

        file.write_all(contents.as_bytes())
            .map_err(|e| self.doc_error(e))?;

        Ok(())
    }

    fn write_error(namespace: &str, err: StoreError) -> StoreError {
        StoreError::Write {
            namespace: namespace.to_string(),
            message: err.to_string(),
        }
    }
}

impl SecretStore for FileStore {
    fn create_table(&self, table: &str) -> Result<()> {
        debug!(table, path = %self.path.display(), "creating table");

        let mut doc = self.read().map_err(|e| StoreError::CreateTable {
            table: table.to_string(),
            message: e.to_string(),
        })?;
        doc.tables.entry(table.to_string()).or_default();
        self.write(&doc).map_err(|e| StoreError::CreateTable {
            table: table.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.read()?.tables.contains_key(table))
    }

    fn list_secrets(&self, table: &str, namespace: &str) -> Result<Secrets> {
        let mut doc = self.read().map_err(|e| StoreError::Read {
            namespace: namespace.to_string(),
            message: e.to_string(),
        })?;
        let mut namespaces = doc
            .tables
            .remove(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        Ok(namespaces
            .remove(namespace)
            .map(Secrets::from_map)
            .unwrap_or_default())
    }

    fn list_namespaces(&self, table: &str) -> Result<Vec<String>> {
        let mut doc = self.read().map_err(|e| StoreError::ListNamespaces {
            table: table.to_string(),
            message: e.to_string(),
        })?;
        let namespaces = doc
            .tables
            .remove(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        Ok(namespaces
            .into_iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(ns, _)| ns)
            .collect())
    }

    fn insert(&self, table: &str, namespace: &str, secrets: &[Secret]) -> Result<()> {
        check_batch(secrets)?;

        let mut doc = self.read().map_err(|e| Self::write_error(namespace, e))?;
        let items = doc
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?
            .entry(namespace.to_string())
            .or_default();
        for secret in secrets {
            items.insert(secret.key().to_string(), secret.value().to_string());
        }

        self.write(&doc).map_err(|e| Self::write_error(namespace, e))?;
        Ok(())
    }

    fn delete(&self, table: &str, namespace: &str, secrets: &[Secret]) -> Result<()> {
        check_batch(secrets)?;

        let mut doc = self.read().map_err(|e| Self::write_error(namespace, e))?;
        let namespaces = doc
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        if let Some(items) = namespaces.get_mut(namespace) {
            for secret in secrets {
                items.remove(secret.key());
            }
            if items.is_empty() {
                namespaces.remove(namespace);
            }
        }

        self.write(&doc).map_err(|e| Self::write_error(namespace, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("store.json"));
        store.create_table("t").unwrap();
        (dir, store)
    }

    #[test]
    fn test_persists_across_instances() {
        let (_dir, store) = store();
        store
            .insert("t", "prod/web", &[Secret::new("API_KEY", "enc")])
            .unwrap();

        let reopened = FileStore::new(store.path());

        assert_eq!(
            reopened.list_secrets("t", "prod/web").unwrap().get("API_KEY"),
            Some("enc")
        );
        assert_eq!(reopened.list_namespaces("t").unwrap(), vec!["prod/web"]);
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = store();
        store
            .insert("t", "app", &[Secret::new("A", "1"), Secret::new("B", "2")])
            .unwrap();
        store.delete("t", "app", &[Secret::new("A", "1")]).unwrap();

        assert_eq!(store.list_secrets("t", "app").unwrap().keys(), vec!["B"]);
    }

    #[test]
    fn test_unknown_namespace_is_empty() {
        let (_dir, store) = store();

        assert!(store.list_secrets("t", "nope").unwrap().is_empty());
    }

    #[test]
    fn test_missing_table() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("store.json"));

        assert!(!store.table_exists("t").unwrap());
        assert!(matches!(
            store.insert("t", "app", &[Secret::new("A", "1")]),
            Err(Error::Store(StoreError::TableNotFound(_)))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_document_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileStore::new(&path);
        store.create_table("t").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let fresh = FileStore::new(dir.path().join("fresh.json"));
        fresh.create_table("t").unwrap();
        let mode = fs::metadata(fresh.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_corrupt_document_is_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();
        let store = FileStore::new(&path);

        assert!(matches!(
            store.list_secrets("t", "app"),
            Err(Error::Store(StoreError::Read { .. }))
        ));
    }
}
