//! Store backend selection.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::{FileStore, MemoryStore, SecretStore};
use crate::core::config::Settings;
use crate::error::{ConfigError, Error, Result};

/// Which secret store to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// In-process store with an empty table, discarded on exit
    Memory,
    /// JSON document on disk (default)
    #[default]
    File,
    /// AWS DynamoDB table
    DynamoDb,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "dynamodb" => Ok(Self::DynamoDb),
            other => Err(ConfigError::UnknownBackend {
                kind: "store",
                name: other.to_string(),
            }
            .into()),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::File => "file",
            Self::DynamoDb => "dynamodb",
        })
    }
}

/// Open the store selected by the settings.
///
/// # Errors
///
/// Returns `ConfigError::FeatureDisabled` for `dynamodb` in a build without
/// the `aws` feature, or the backend's connection error.
pub fn open(settings: &Settings) -> Result<Box<dyn SecretStore>> {
    debug!(backend = %settings.store, "opening secret store");

    match settings.store {
        StoreBackend::Memory => Ok(Box::new(MemoryStore::with_table(&settings.table))),
        StoreBackend::File => Ok(Box::new(FileStore::new(&settings.store_path))),
        StoreBackend::DynamoDb => {
            #[cfg(feature = "aws")]
            {
                let store = super::dynamodb::DynamoDb::connect(settings.region.as_deref())?;
                Ok(Box::new(store))
            }
            #[cfg(not(feature = "aws"))]
            {
                Err(ConfigError::FeatureDisabled("dynamodb".to_string()).into())
            }
        }
    }
}
