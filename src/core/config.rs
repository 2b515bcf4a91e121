//! Configuration file management.
//!
//! Reads the optional `.strata.toml` in the current directory and resolves
//! it, together with command-line overrides, into [`Settings`].
//!
//! ```toml
//! [store]
//! backend = "dynamodb"
//! table = "strata"
//! region = "ap-northeast-1"
//!
//! [cipher]
//! backend = "aws-kms"
//! key_alias = "strata"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::cipher::CipherBackend;
use crate::core::constants;
use crate::core::store::StoreBackend;
use crate::error::{ConfigError, Result};

/// Contents of `.strata.toml`. Every field is optional.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cipher: CipherConfig,
}

/// `[store]` section
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// "file" (default), "memory" or "dynamodb"
    pub backend: Option<String>,
    /// Document path for the file backend
    pub path: Option<PathBuf>,
    /// Table name
    pub table: Option<String>,
    /// AWS region
    pub region: Option<String>,
    /// Items per write request
    pub batch_limit: Option<usize>,
}

/// `[cipher]` section
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CipherConfig {
    /// "age" (default) or "aws-kms"
    pub backend: Option<String>,
    /// Default key alias
    pub key_alias: Option<String>,
    /// Directory holding local age keys
    pub keys_dir: Option<PathBuf>,
}

impl Config {
    /// Path to the configuration file in the current directory
    pub fn config_path() -> PathBuf {
        PathBuf::from(constants::CONFIG_FILE)
    }

    /// Load `.strata.toml` from the current directory, if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse` for an
    /// unreadable or malformed file. A missing file is not an error.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            debug!("no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load a configuration file from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse`.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        Ok(config)
    }
}

/// Values given on the command line (or through their environment variables).
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub table: Option<String>,
    pub key_alias: Option<String>,
    pub region: Option<String>,
    pub store: Option<String>,
    pub store_path: Option<PathBuf>,
    pub cipher: Option<String>,
}

/// Fully resolved settings, passed explicitly to every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store: StoreBackend,
    pub store_path: PathBuf,
    pub table: String,
    pub region: Option<String>,
    pub batch_limit: usize,
    pub cipher: CipherBackend,
    pub key_alias: String,
    pub keys_dir: PathBuf,
}

impl Settings {
    /// Resolve settings: overrides first, then the config file, then defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownBackend` for an unknown backend name,
    /// `ConfigError::InvalidValue` for an out-of-range batch limit or an
    /// empty name, or `ConfigError::NoHomeDir` if the key directory cannot
    /// be located.
    pub fn resolve(config: &Config, overrides: Overrides) -> Result<Self> {
        let store = match overrides.store.or_else(|| config.store.backend.clone()) {
            Some(name) => name.parse()?,
            None => StoreBackend::default(),
        };
        let cipher = match overrides.cipher.or_else(|| config.cipher.backend.clone()) {
            Some(name) => name.parse()?,
            None => CipherBackend::default(),
        };

        let table = overrides
            .table
            .or_else(|| config.store.table.clone())
            .unwrap_or_else(|| constants::DEFAULT_TABLE.to_string());
        if table.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "table",
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        let key_alias = overrides
            .key_alias
            .or_else(|| config.cipher.key_alias.clone())
            .unwrap_or_else(|| constants::DEFAULT_KEY_ALIAS.to_string());
        if key_alias.is_empty() || key_alias.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                field: "key_alias",
                reason: format!("{key_alias:?} is not a valid alias"),
            }
            .into());
        }

        let batch_limit = config.store.batch_limit.unwrap_or(constants::BATCH_LIMIT);
        if batch_limit == 0 || batch_limit > constants::BATCH_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "batch_limit",
                reason: format!("must be between 1 and {}", constants::BATCH_LIMIT),
            }
            .into());
        }

        let keys_dir = match config.cipher.keys_dir.clone() {
            Some(dir) => dir,
            None => dirs::home_dir()
                .ok_or(ConfigError::NoHomeDir)?
                .join(constants::KEY_DIR),
        };

        let settings = Self {
            store,
            store_path: overrides
                .store_path
                .or_else(|| config.store.path.clone())
                .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_STORE_PATH)),
            table,
            region: overrides.region.or_else(|| config.store.region.clone()),
            batch_limit,
            cipher,
            key_alias,
            keys_dir,
        };

        debug!(
            store = %settings.store,
            cipher = %settings.cipher,
            table = %settings.table,
            "settings resolved"
        );
        Ok(settings)
    }
}
