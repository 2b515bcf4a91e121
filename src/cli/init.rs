//! Init command.
//!
//! Creates the table and, for the local cipher, the key of the alias.

use tracing::info;

use crate::cli::output::Printer;
use crate::core::cipher::{CipherBackend, KeyStore};
use crate::core::config::Settings;
use crate::core::store::{self, SecretStore};
use crate::error::Result;

/// Create the table and the local key.
pub fn execute(settings: &Settings, printer: &Printer) -> Result<()> {
    info!(table = %settings.table, "initializing");

    let store = store::open(settings)?;
    if store.table_exists(&settings.table)? {
        printer.dimmed(&format!("table {} already exists", settings.table));
    } else {
        store.create_table(&settings.table)?;
        printer.success(&format!("table {} created", settings.table));
    }

    if settings.cipher == CipherBackend::Age {
        let keys = KeyStore::new(&settings.keys_dir);
        if keys.has_key(&settings.key_alias) {
            printer.dimmed(&format!("key {} already exists", settings.key_alias));
        } else {
            let public_key = keys.generate(&settings.key_alias)?;
            printer.success(&format!(
                "key {} created ({})",
                printer.key(&settings.key_alias),
                public_key
            ));
        }
    }

    Ok(())
}
