//! Strata - keep a tree of encrypted secret files in sync with a secret store.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── sync          # Reconcile a directory with the store
//! │   ├── encrypt       # Encrypt values into secret files
//! │   ├── validate      # Check that local secrets decrypt
//! │   ├── dump / exec   # Use remote secrets
//! │   └── output        # Terminal printer
//! └── core/             # Core library components
//!     ├── namespace     # Path -> namespace derivation
//!     ├── walk          # Secret file discovery
//!     ├── domain/       # Secret sets, diffs, summaries
//!     ├── batch         # Size-limited batch writes
//!     ├── include       # `_include` expansion
//!     ├── reconcile     # Local vs remote namespace sets
//!     ├── sync          # Sync orchestrator and Reporter trait
//!     ├── store/        # Secret store backends
//!     ├── cipher/       # Value encryption backends
//!     └── config        # .strata.toml and resolved settings
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use strata::core::store::MemoryStore;
//! use strata::core::sync::{Silent, SyncOptions, Syncer};
//!
//! let syncer = Syncer::new(
//!     MemoryStore::with_table("strata"),
//!     SyncOptions::new("strata").dry_run(true),
//! );
//! let report = syncer.run(Path::new("secrets"), &mut Silent)?;
//! println!("{} keys would change", report.changed_keys());
//! # Ok::<(), strata::error::Error>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
