//! Validate command.
//!
//! Decrypts every secret under a directory and lists the ones that fail.

use std::path::Path;

use tracing::{debug, info};

use crate::cli::output::Printer;
use crate::core::cipher::{self, Cipher};
use crate::core::config::Settings;
use crate::core::constants::INCLUDE_KEY;
use crate::core::secrets::SecretFile;
use crate::core::walk::list_secret_files;
use crate::error::{Error, Result};

/// Validate every secret file under `dir`.
pub fn execute(settings: &Settings, printer: &Printer, dir: &Path) -> Result<()> {
    info!(dir = %dir.display(), "validating secrets");

    let cipher = cipher::open(settings)?;
    let mut invalid = 0usize;

    for path in list_secret_files(dir)? {
        printer.header(&path.display().to_string());
        let file = SecretFile::load(&path)?;

        for secret in file.secrets.iter().filter(|s| s.key() != INCLUDE_KEY) {
            if let Err(e) = cipher.decrypt(secret.key(), secret.value()) {
                debug!(key = secret.key(), error = %e, "invalid secret");
                printer.error(&format!("  {}: {e}", printer.key(secret.key())));
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        printer.hint("re-encrypt with: strata encrypt KEY --add FILE");
        return Err(Error::Other(format!("{invalid} invalid secret(s)")));
    }

    printer.success("all secrets are valid");
    Ok(())
}
