//! Secret store backends.
//!
//! The store keeps secrets in a table, partitioned by namespace and keyed by
//! secret key. Writes are batched by the caller: implementations may reject
//! more than [`BATCH_LIMIT`] items per call.
//!
//! ## Backends
//!
//! - **memory**: In-process maps. Used by tests and throwaway dry runs.
//! - **file**: A JSON document on disk. Default, always available.
//! - **dynamodb**: Feature-gated (`aws`). Uses an AWS DynamoDB table.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `SecretStore` trait
//! 2. Add the implementation in a new file
//! 3. Wire it into `backend::open`

use crate::core::constants::BATCH_LIMIT;
use crate::core::domain::{Secret, Secrets};
use crate::error::{Result, StoreError};

mod backend;
mod file;
mod memory;

#[cfg(feature = "aws")]
pub mod dynamodb;

pub use backend::{open, StoreBackend};
pub use file::FileStore;
pub use memory::{MemoryStore, Request};

/// Secret store trait.
///
/// All calls block until the store has answered.
pub trait SecretStore {
    /// Create a table.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CreateTable` if the store refuses.
    fn create_table(&self, table: &str) -> Result<()>;

    /// Check whether a table exists.
    fn table_exists(&self, table: &str) -> Result<bool>;

    /// All secrets of a namespace. An unknown namespace is an empty set.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Read` if the store cannot be queried.
    fn list_secrets(&self, table: &str, namespace: &str) -> Result<Secrets>;

    /// All namespaces holding at least one secret.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ListNamespaces` if the store cannot be scanned.
    fn list_namespaces(&self, table: &str) -> Result<Vec<String>>;

    /// Create or overwrite secrets in one request.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Write` on remote failure, or
    /// `StoreError::BatchTooLarge` for more than [`BATCH_LIMIT`] secrets.
    fn insert(&self, table: &str, namespace: &str, secrets: &[Secret]) -> Result<()>;

    /// Delete secrets by key in one request.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Write` on remote failure, or
    /// `StoreError::BatchTooLarge` for more than [`BATCH_LIMIT`] secrets.
    fn delete(&self, table: &str, namespace: &str, secrets: &[Secret]) -> Result<()>;
}

impl<S: SecretStore + ?Sized> SecretStore for Box<S> {
    fn create_table(&self, table: &str) -> Result<()> {
        (**self).create_table(table)
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        (**self).table_exists(table)
    }

    fn list_secrets(&self, table: &str, namespace: &str) -> Result<Secrets> {
        (**self).list_secrets(table, namespace)
    }

    fn list_namespaces(&self, table: &str) -> Result<Vec<String>> {
        (**self).list_namespaces(table)
    }

    fn insert(&self, table: &str, namespace: &str, secrets: &[Secret]) -> Result<()> {
        (**self).insert(table, namespace, secrets)
    }

    fn delete(&self, table: &str, namespace: &str, secrets: &[Secret]) -> Result<()> {
        (**self).delete(table, namespace, secrets)
    }
}

/// Reject a batch over the per-request limit.
pub(crate) fn check_batch(secrets: &[Secret]) -> Result<()> {
    if secrets.len() > BATCH_LIMIT {
        return Err(StoreError::BatchTooLarge {
            size: secrets.len(),
            limit: BATCH_LIMIT,
        }
        .into());
    }
    Ok(())
}
