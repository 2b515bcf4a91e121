//! Namespaces command.

use crate::core::config::Settings;
use crate::core::store::{self, SecretStore};
use crate::error::Result;

/// Print every namespace in the store, one per line.
pub fn execute(settings: &Settings) -> Result<()> {
    let store = store::open(settings)?;
    for namespace in store.list_namespaces(&settings.table)? {
        println!("{namespace}");
    }
    Ok(())
}
