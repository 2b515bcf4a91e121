//! Namespace includes.
//!
//! A secret keyed `_include` holds, in plain text, a comma-separated list of
//! namespaces whose secrets are spliced in at that position. Expansion runs
//! before diffing, so the store only ever sees the expanded set. Keys
//! declared after the include override included ones through last-wins.

use tracing::debug;

use crate::core::constants::INCLUDE_KEY;
use crate::core::domain::Secrets;
use crate::error::{Result, SyncError};

/// Expand every include of `secrets`, recursively.
///
/// `resolve` returns the local secrets of a namespace, or `None` if no
/// secret file declares it.
///
/// # Errors
///
/// Returns `SyncError::CircularInclude` when a namespace includes itself
/// directly or transitively, `SyncError::UnknownInclude` when `resolve`
/// finds nothing, or any error from `resolve`.
pub fn expand_includes<F>(namespace: &str, secrets: Secrets, mut resolve: F) -> Result<Secrets>
where
    F: FnMut(&str) -> Result<Option<Secrets>>,
{
    let mut stack = Vec::new();
    expand(namespace, secrets, &mut resolve, &mut stack)
}

/// Whether a set declares any include.
pub fn has_includes(secrets: &Secrets) -> bool {
    secrets.iter().any(|s| s.key() == INCLUDE_KEY)
}

fn expand<F>(
    namespace: &str,
    secrets: Secrets,
    resolve: &mut F,
    stack: &mut Vec<String>,
) -> Result<Secrets>
where
    F: FnMut(&str) -> Result<Option<Secrets>>,
{
    stack.push(namespace.to_string());

    let mut expanded = Secrets::new();
    for secret in secrets {
        if secret.key() != INCLUDE_KEY {
            expanded.push(secret);
            continue;
        }

        for target in secret.value().split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if stack.iter().any(|ns| ns == target) {
                let mut chain = stack.clone();
                chain.push(target.to_string());
                return Err(SyncError::CircularInclude { chain }.into());
            }

            let included = resolve(target)?.ok_or_else(|| SyncError::UnknownInclude {
                namespace: namespace.to_string(),
                include: target.to_string(),
            })?;

            debug!(namespace, include = target, "expanding include");
            for secret in expand(target, included, resolve, stack)? {
                expanded.push(secret);
            }
        }
    }

    stack.pop();
    Ok(expanded)
}
