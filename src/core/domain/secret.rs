//! Secret and secret set types.
//!
//! A [`Secret`] is a key paired with an opaque ciphertext. A [`Secrets`] set
//! keeps insertion order and tolerates duplicate keys; last-occurrence-wins
//! only appears through [`Secrets::to_map`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{EncryptedValue, SecretKey};

/// An encrypted secret with its key name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Secret {
    key: SecretKey,
    value: EncryptedValue,
}

impl Secret {
    /// Create a new secret from a key and encrypted value
    pub fn new(key: impl Into<SecretKey>, value: impl Into<EncryptedValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Secret's key name
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Encrypted ciphertext
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// An ordered set of secrets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secrets(Vec<Secret>);

impl Secrets {
    /// Create an empty set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a set from a key/value map, ordered by key.
    pub fn from_map(map: BTreeMap<SecretKey, EncryptedValue>) -> Self {
        map.into_iter().map(|(k, v)| Secret::new(k, v)).collect()
    }

    /// Convert to a key/value map. Later duplicates overwrite earlier ones.
    pub fn to_map(&self) -> BTreeMap<SecretKey, EncryptedValue> {
        self.0
            .iter()
            .map(|s| (s.key.clone(), s.value.clone()))
            .collect()
    }

    /// Append a secret, keeping any earlier secret with the same key.
    pub fn push(&mut self, secret: Secret) {
        self.0.push(secret);
    }

    /// Value of the last secret with the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|s| s.key == key)
            .map(|s| s.value.as_str())
    }

    /// Key names in set order, duplicates included.
    pub fn keys(&self) -> Vec<&str> {
        self.0.iter().map(|s| s.key.as_str()).collect()
    }

    /// Keys that occur more than once, sorted.
    pub fn duplicate_keys(&self) -> Vec<&str> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for secret in &self.0 {
            *counts.entry(secret.key.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(k, _)| k)
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Secret> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Secret] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Secret>> for Secrets {
    fn from(secrets: Vec<Secret>) -> Self {
        Self(secrets)
    }
}

impl FromIterator<Secret> for Secrets {
    fn from_iter<I: IntoIterator<Item = Secret>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Secrets {
    type Item = Secret;
    type IntoIter = std::vec::IntoIter<Secret>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Secrets {
    type Item = &'a Secret;
    type IntoIter = std::slice::Iter<'a, Secret>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
