//! Dotenv rendering of decrypted secrets.

use crate::core::cipher::Cipher;
use crate::core::domain::Secrets;
use crate::error::Result;

/// How template entries are filled.
#[derive(Debug, Default, Clone, Copy)]
pub struct RenderOptions {
    /// Replace template values that are already set
    pub override_values: bool,
    /// Quote values with escapes
    pub quote: bool,
}

fn line(key: &str, value: &str, quote: bool) -> String {
    if quote {
        format!("{key}={value:?}")
    } else {
        format!("{key}={value}")
    }
}

/// Render every secret as a `KEY=VALUE` line, in set order.
///
/// # Errors
///
/// Returns the cipher's error for the first value that fails to decrypt.
pub fn render_all<C>(secrets: &Secrets, cipher: &C, quote: bool) -> Result<Vec<String>>
where
    C: Cipher + ?Sized,
{
    secrets
        .iter()
        .map(|secret| {
            let plain = cipher.decrypt(secret.key(), secret.value())?;
            Ok(line(secret.key(), &plain, quote))
        })
        .collect()
}

/// Fill a dotenv template.
///
/// Comment lines and lines without `=` pass through unchanged. An entry
/// takes the secret's value when its own value is empty, or always with
/// `override_values`, provided the set has the key.
///
/// # Errors
///
/// Returns the cipher's error for the first value that fails to decrypt.
pub fn render_with_template<C>(
    secrets: &Secrets,
    template: &str,
    cipher: &C,
    options: RenderOptions,
) -> Result<Vec<String>>
where
    C: Cipher + ?Sized,
{
    let mut rendered = Vec::new();

    for raw in template.lines() {
        if raw.starts_with('#') {
            rendered.push(raw.to_string());
            continue;
        }
        let Some((key, value)) = raw.split_once('=') else {
            rendered.push(raw.to_string());
            continue;
        };

        let filled = match secrets.get(key) {
            Some(encrypted) if options.override_values || value.is_empty() => {
                cipher.decrypt(key, encrypted)?
            }
            _ => value.to_string(),
        };
        rendered.push(line(key, &filled, options.quote));
    }

    Ok(rendered)
}
