//! Constants used throughout strata.
//!
//! Centralizes magic strings and configuration values.

/// Configuration file name (.strata.toml).
pub const CONFIG_FILE: &str = ".strata.toml";

/// Default store document path for the file backend.
pub const DEFAULT_STORE_PATH: &str = ".strata/store.json";

/// Default table name.
pub const DEFAULT_TABLE: &str = "strata";

/// Default key alias used for encryption.
pub const DEFAULT_KEY_ALIAS: &str = "strata";

/// Key storage directory relative to HOME (~/.strata/keys).
pub const KEY_DIR: &str = ".strata/keys";

/// Hard per-request item limit of a batch write.
///
/// DynamoDB rejects BatchWriteItem requests with more than 25 items.
pub const BATCH_LIMIT: usize = 25;

/// Secret key whose value names namespaces to splice in.
pub const INCLUDE_KEY: &str = "_include";
