//! Error types.
//!
//! Each concern has its own error enum; all of them fold into [`Error`].

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{0}")]
    Other(String),
}

/// Configuration loading and resolution errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unknown {kind} backend: {name}")]
    UnknownBackend { kind: &'static str, name: String },

    #[error("backend {0} requires building with --features aws")]
    FeatureDisabled(String),

    #[error("unable to determine home directory")]
    NoHomeDir,
}

/// Secret file errors.
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("failed to read secret file {}: {source}", path.display())]
    FileLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse secret file {}: {source}", path.display())]
    FileParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to save secret file {}: {source}", path.display())]
    FileSave {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize secrets: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("invalid KEY=VALUE pair: {0:?}")]
    InvalidPair(String),

    #[error("secret not found: {namespace}/{key}")]
    NotFound { namespace: String, key: String },

    #[error("namespace {0} has no secrets")]
    EmptyNamespace(String),
}

/// Secret store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read secrets of namespace {namespace}: {message}")]
    Read { namespace: String, message: String },

    #[error("failed to write secrets of namespace {namespace}: {message}")]
    Write { namespace: String, message: String },

    #[error("failed to list namespaces of table {table}: {message}")]
    ListNamespaces { table: String, message: String },

    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("failed to create table {table}: {message}")]
    CreateTable { table: String, message: String },

    #[error("batch of {size} items exceeds the limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },

    #[error("store document {}: {message}", path.display())]
    Document { path: PathBuf, message: String },
}

/// Encryption and decryption errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("ciphertext was encrypted for key {actual:?}, not {expected:?}")]
    ContextMismatch { expected: String, actual: String },

    #[error("no key found for alias {0}")]
    NoKey(String),

    #[error("invalid key file for alias {alias}: {reason}")]
    InvalidKey { alias: String, reason: String },
}

/// Reconciliation errors.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("failed to read directory {}: {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid path {}: {source}", path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("circular include: {}", chain.join(" -> "))]
    CircularInclude { chain: Vec<String> },

    #[error("namespace {namespace} includes unknown namespace {include}")]
    UnknownInclude { namespace: String, include: String },

    #[error("namespace {namespace} is declared by both {} and {}", first.display(), second.display())]
    DuplicateNamespace {
        namespace: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("no secret file for namespace {0}")]
    NamespaceNotFound(String),

    #[error("batch limit must be between 1 and {}", crate::core::constants::BATCH_LIMIT)]
    InvalidBatchLimit,

    #[error("{stage} failed for namespace {namespace} ({}): {source}", file.display())]
    Namespace {
        namespace: String,
        file: PathBuf,
        stage: Stage,
        #[source]
        source: Box<Error>,
    },
}

/// The step of a namespace sync that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Include,
    Fetch,
    Delete,
    Insert,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Include => "include",
            Stage::Fetch => "fetch",
            Stage::Delete => "delete",
            Stage::Insert => "insert",
        };
        f.write_str(name)
    }
}

impl Error {
    /// The failing stage, if this error came out of a namespace sync.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Sync(SyncError::Namespace { stage, .. }) => Some(*stage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
