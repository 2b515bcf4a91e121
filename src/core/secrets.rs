//! Secret file operations (load, save).
//!
//! A secret file is YAML in one of two shapes:
//!
//! ```yaml
//! - key: DATABASE_URL
//!   value: AQICAHh...
//! ```
//!
//! or, to override the key alias used when encrypting into this file:
//!
//! ```yaml
//! kms_key: production
//! secrets:
//!   - key: DATABASE_URL
//!     value: AQICAHh...
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::domain::{Secret, Secrets};
use crate::core::include::has_includes;
use crate::core::types::KeyAlias;
use crate::error::{Result, SecretError};

/// Contents of one secret file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretFile {
    /// Key alias override for this file
    pub key_alias: Option<KeyAlias>,
    /// Secrets in file order
    pub secrets: Secrets,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Format {
    List(Secrets),
    Document {
        #[serde(default)]
        kms_key: Option<KeyAlias>,
        #[serde(default)]
        secrets: Secrets,
    },
}

#[derive(Serialize)]
struct Document<'a> {
    kms_key: &'a str,
    secrets: &'a Secrets,
}

impl SecretFile {
    /// Load a secret file.
    ///
    /// An empty file is an empty set. Duplicate keys are kept and logged.
    ///
    /// # Errors
    ///
    /// Returns `SecretError::FileLoad` if the file cannot be read, or
    /// `SecretError::FileParse` if it is not a valid secret file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading secret file");

        let contents = std::fs::read_to_string(path).map_err(|source| SecretError::FileLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let file = Self::parse(&contents).map_err(|source| SecretError::FileParse {
            path: path.to_path_buf(),
            source,
        })?;

        for key in file.secrets.duplicate_keys() {
            warn!(path = %path.display(), key, "duplicate key, last value wins");
        }

        Ok(file)
    }

    fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let file = match serde_yaml::from_str(contents)? {
            Format::List(secrets) => Self {
                key_alias: None,
                secrets,
            },
            Format::Document { kms_key, secrets } => Self {
                key_alias: kms_key,
                secrets,
            },
        };
        Ok(file)
    }

    /// Set the value of a key.
    ///
    /// An existing key keeps its position. A new key is inserted in key
    /// order; in a file with includes it is appended instead.
    pub fn set(&mut self, key: &str, value: &str) {
        if self.secrets.get(key).is_some() {
            self.secrets = self
                .secrets
                .iter()
                .map(|s| {
                    if s.key() == key {
                        Secret::new(key, value)
                    } else {
                        s.clone()
                    }
                })
                .collect();
        } else if has_includes(&self.secrets) {
            self.secrets.push(Secret::new(key, value));
        } else {
            let mut map = self.secrets.to_map();
            map.insert(key.to_string(), value.to_string());
            self.secrets = Secrets::from_map(map);
        }
    }

    /// Render the file as YAML.
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Serialize` if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        let yaml = match &self.key_alias {
            Some(alias) => serde_yaml::to_string(&Document {
                kms_key: alias,
                secrets: &self.secrets,
            }),
            None => serde_yaml::to_string(&self.secrets),
        };
        yaml.map_err(|e| SecretError::Serialize(e).into())
    }

    /// Write the file to disk, replacing any existing contents.
    ///
    /// # Errors
    ///
    /// Returns `SecretError::FileSave` if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), secrets = self.secrets.len(), "saving secret file");

        let save_error = |source| SecretError::FileSave {
            path: path.to_path_buf(),
            source,
        };

        let yaml = self.to_yaml()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(save_error)?;
        }
        std::fs::write(path, yaml).map_err(save_error)?;
        Ok(())
    }
}
