//! Namespace derivation.
//!
//! A namespace is the path of a secret file relative to the secret
//! directory, with forward slashes and without the YAML extension:
//! `secrets/production/web.yaml` under `secrets` is `production/web`.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::core::types::Namespace;
use crate::error::{Result, SyncError};

/// Strip a trailing `.yml`/`.yaml` (any case) from a name.
///
/// Returns `None` if the name has no YAML extension.
pub fn strip_yaml_ext(name: &str) -> Option<&str> {
    let lower = name.to_ascii_lowercase();
    [".yaml", ".yml"]
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &name[..name.len() - ext.len()])
}

/// Whether a path names a secret file: not hidden, YAML extension.
pub fn is_secret_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    !name.starts_with('.') && strip_yaml_ext(name).is_some()
}

/// Derive the namespace of a secret file relative to a base directory.
///
/// Both paths are made absolute against the current directory and cleaned
/// lexically, so neither has to exist. A path outside `base_dir` keeps its
/// full absolute form.
///
/// # Errors
///
/// Returns `SyncError::InvalidPath` if the current directory cannot be
/// resolved, the path is not valid UTF-8, or the path is `base_dir` itself.
pub fn derive_namespace(path: &Path, base_dir: &Path) -> Result<Namespace> {
    let full_path = absolute(path)?;
    let full_dir = absolute(base_dir)?;

    let relative = full_path.strip_prefix(&full_dir).unwrap_or(&full_path);

    let mut segments = Vec::new();
    for component in relative.components() {
        if let Component::Normal(segment) = component {
            let segment = segment.to_str().ok_or_else(|| SyncError::InvalidPath {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidData, "path is not valid UTF-8"),
            })?;
            segments.push(segment);
        }
    }

    let joined = segments.join("/");
    let namespace = strip_yaml_ext(&joined)
        .unwrap_or(&joined)
        .trim_start_matches('/');
    if namespace.is_empty() {
        return Err(SyncError::InvalidPath {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path has no namespace"),
        }
        .into());
    }

    Ok(namespace.to_string())
}

/// Absolute, lexically cleaned form of a path.
fn absolute(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|source| SyncError::InvalidPath {
            path: path.to_path_buf(),
            source,
        })?;
        cwd.join(path)
    };

    let mut cleaned = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }

    Ok(cleaned)
}
