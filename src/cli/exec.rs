//! Exec command.
//!
//! Runs a command with the decrypted secrets of a namespace added to its
//! environment, then exits with the command's exit code.

use tracing::info;
use zeroize::Zeroizing;

use crate::core::cipher::{self, Cipher};
use crate::core::config::Settings;
use crate::core::store::{self, SecretStore};
use crate::error::{Error, Result, SecretError};

/// Run a command with secrets injected as environment variables.
pub fn execute(settings: &Settings, namespace: &str, keys: &[String], command: &[String]) -> Result<()> {
    let exit_code = run_with_secrets(settings, namespace, keys, command)?;
    std::process::exit(exit_code);
}

fn run_with_secrets(
    settings: &Settings,
    namespace: &str,
    keys: &[String],
    command: &[String],
) -> Result<i32> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| Error::Other("no command specified".to_string()))?;
    info!(namespace, program = %program, "executing");

    let store = store::open(settings)?;
    let secrets = store.list_secrets(&settings.table, namespace)?;
    if secrets.is_empty() {
        return Err(SecretError::EmptyNamespace(namespace.to_string()).into());
    }

    let cipher = cipher::open(settings)?;
    let mut cmd = std::process::Command::new(program);
    cmd.args(args);

    for secret in &secrets {
        if !keys.is_empty() && !keys.iter().any(|k| k == secret.key()) {
            continue;
        }
        let value = Zeroizing::new(cipher.decrypt(secret.key(), secret.value())?);
        cmd.env(secret.key(), value.as_str());
    }

    let status = cmd.status()?;
    Ok(status.code().unwrap_or(1))
}
