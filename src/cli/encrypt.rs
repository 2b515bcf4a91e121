//! Encrypt command.
//!
//! Encrypts one value, printing the ciphertext or writing it into a secret
//! file. Without `=VALUE` the value is read from stdin when piped, or from
//! a hidden prompt.

use std::io::{self, IsTerminal};
use std::path::Path;

use dialoguer::Password;
use tracing::info;
use zeroize::Zeroizing;

use crate::cli::output::Printer;
use crate::core::cipher::{self, Cipher};
use crate::core::config::Settings;
use crate::core::secrets::SecretFile;
use crate::error::{Result, SecretError};

/// Split `KEY=VALUE`; a bare `KEY` has no value.
fn parse_pair(pair: &str) -> Result<(&str, Option<&str>)> {
    let (key, value) = match pair.split_once('=') {
        Some((key, value)) => (key, Some(value)),
        None => (pair, None),
    };
    if key.trim().is_empty() {
        return Err(SecretError::InvalidPair(pair.to_string()).into());
    }
    Ok((key, value))
}

fn read_value(printer: &Printer, key: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut input = Zeroizing::new(String::new());
        io::stdin().read_line(&mut input)?;
        return Ok(Zeroizing::new(input.trim_end_matches(['\r', '\n']).to_string()));
    }

    let value = Password::new()
        .with_prompt(format!("Value for {}", printer.key(key)))
        .interact()?;
    Ok(Zeroizing::new(value))
}

/// Encrypt a value.
pub fn execute(settings: &Settings, printer: &Printer, pair: &str, add: Option<&Path>) -> Result<()> {
    let (key, value) = parse_pair(pair)?;
    info!(key, "encrypting");

    let value = match value {
        Some(value) => Zeroizing::new(value.to_string()),
        None => read_value(printer, key)?,
    };

    let mut file = match add {
        Some(path) if path.exists() => Some(SecretFile::load(path)?),
        Some(_) => Some(SecretFile::default()),
        None => None,
    };

    let key_alias = file
        .as_ref()
        .and_then(|f| f.key_alias.as_deref())
        .unwrap_or(&settings.key_alias);

    let cipher = cipher::open(settings)?;
    let encrypted = cipher.encrypt(key_alias, key, &value)?;

    match (add, file.as_mut()) {
        (Some(path), Some(file)) => {
            file.set(key, &encrypted);
            file.save(path)?;
            printer.success(&format!(
                "{} saved to {}",
                printer.key(key),
                printer.path(path.display())
            ));
        }
        _ => println!("{encrypted}"),
    }

    Ok(())
}
