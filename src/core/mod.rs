//! Core library components.
//!
//! The reconciliation engine and its collaborators: namespace derivation,
//! tree walking, diffing, batched writes, include expansion, the sync
//! orchestrator, and the store and cipher backends it talks to.

#[cfg(feature = "aws")]
pub mod aws;
pub mod batch;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod dotenv;
pub mod include;
pub mod namespace;
pub mod reconcile;
pub mod secrets;
pub mod store;
pub mod sync;
pub mod types;
pub mod walk;
