//! Get command.

use crate::core::cipher::{self, Cipher};
use crate::core::config::Settings;
use crate::core::store::{self, SecretStore};
use crate::error::{Result, SecretError};

/// Print the decrypted value of one key.
pub fn execute(settings: &Settings, namespace: &str, key: &str) -> Result<()> {
    let store = store::open(settings)?;
    let secrets = store.list_secrets(&settings.table, namespace)?;

    let value = secrets.get(key).ok_or_else(|| SecretError::NotFound {
        namespace: namespace.to_string(),
        key: key.to_string(),
    })?;

    let cipher = cipher::open(settings)?;
    println!("{}", cipher.decrypt(key, value)?);
    Ok(())
}
