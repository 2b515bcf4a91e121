//! Dump command - print remote secrets in dotenv format.

use std::path::Path;

use tracing::info;

use crate::core::cipher;
use crate::core::config::Settings;
use crate::core::dotenv::{render_all, render_with_template, RenderOptions};
use crate::core::store::{self, SecretStore};
use crate::error::{Result, SecretError};

/// Dump the secrets of a namespace, optionally filling a template.
pub fn execute(
    settings: &Settings,
    namespace: &str,
    template: Option<&Path>,
    override_values: bool,
    quote: bool,
) -> Result<()> {
    info!(namespace, "dumping secrets");

    let store = store::open(settings)?;
    let secrets = store.list_secrets(&settings.table, namespace)?;
    if secrets.is_empty() {
        return Err(SecretError::EmptyNamespace(namespace.to_string()).into());
    }

    let cipher = cipher::open(settings)?;
    let lines = match template {
        Some(path) => {
            let template = std::fs::read_to_string(path)?;
            let options = RenderOptions {
                override_values,
                quote,
            };
            render_with_template(&secrets, &template, &cipher, options)?
        }
        None => render_all(&secrets, &cipher, quote)?,
    };

    for line in lines {
        println!("{line}");
    }
    Ok(())
}
