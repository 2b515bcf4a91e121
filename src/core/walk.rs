//! Secret file discovery.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::core::namespace::{derive_namespace, is_secret_file};
use crate::core::types::Namespace;
use crate::error::{Result, SyncError};

/// List all secret files under a directory, recursively.
///
/// Every directory is descended into, hidden ones included. Entries are
/// visited in file name order so the result is stable for an unchanged tree.
///
/// # Errors
///
/// Returns `SyncError::DirectoryRead` if the root is not a directory or any
/// directory cannot be read; no partial list is returned.
pub fn list_secret_files(root: &Path) -> Result<Vec<PathBuf>> {
    debug!(root = %root.display(), "listing secret files");

    let metadata = std::fs::metadata(root).map_err(|source| SyncError::DirectoryRead {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(SyncError::DirectoryRead {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        }
        .into());
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| SyncError::DirectoryRead {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source: source.into(),
        })?;

        if entry.file_type().is_dir() || !is_secret_file(entry.path()) {
            continue;
        }

        trace!(path = %entry.path().display(), "found secret file");
        files.push(entry.into_path());
    }

    debug!(count = files.len(), "secret files listed");
    Ok(files)
}

/// List secret files under a directory paired with their namespaces.
///
/// # Errors
///
/// Returns the walk error, `SyncError::InvalidPath` for a file whose
/// namespace cannot be derived, or `SyncError::DuplicateNamespace` when two
/// files map to the same namespace (`app.yaml` and `app.yml`).
pub fn list_namespaced_files(root: &Path) -> Result<Vec<(PathBuf, Namespace)>> {
    let mut seen: HashMap<Namespace, PathBuf> = HashMap::new();
    let mut pairs = Vec::new();

    for file in list_secret_files(root)? {
        let namespace = derive_namespace(&file, root)?;
        if let Some(first) = seen.get(&namespace) {
            return Err(SyncError::DuplicateNamespace {
                namespace,
                first: first.clone(),
                second: file,
            }
            .into());
        }
        seen.insert(namespace.clone(), file.clone());
        pairs.push((file, namespace));
    }

    Ok(pairs)
}
