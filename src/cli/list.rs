//! List command.

use std::path::Path;

use crate::core::cipher::{self, Cipher};
use crate::core::config::Settings;
use crate::core::constants::INCLUDE_KEY;
use crate::core::secrets::SecretFile;
use crate::error::Result;

/// Print `KEY\tVALUE` for every secret of a local file.
///
/// Include entries are printed as they are, since they are not encrypted.
pub fn execute(settings: &Settings, file: &Path) -> Result<()> {
    let secrets = SecretFile::load(file)?.secrets;
    let cipher = cipher::open(settings)?;

    for secret in &secrets {
        if secret.key() == INCLUDE_KEY {
            println!("{}\t{}", secret.key(), secret.value());
            continue;
        }
        let value = cipher.decrypt(secret.key(), secret.value())?;
        println!("{}\t{}", secret.key(), value);
    }

    Ok(())
}
