//! Value encryption.
//!
//! Secret files and the store only ever hold ciphertext. A cipher encrypts a
//! value under a named key alias and binds it to the secret key it belongs
//! to, so a ciphertext copied under another key does not decrypt.
//!
//! ## Backends
//!
//! - **age**: Default, always available. One x25519 identity per alias,
//!   kept under `~/.strata/keys`.
//! - **AWS KMS**: Feature-gated (`aws`). Uses `alias/<key_alias>` with the
//!   secret key as encryption context.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Cipher` trait
//! 2. Add the implementation in a new file
//! 3. Wire it into `backend::open`

use crate::error::Result;

mod age;
mod backend;

#[cfg(feature = "aws")]
pub mod kms;

pub use age::{Age, KeyStore};
pub use backend::{open, CipherBackend};

/// Cipher trait.
pub trait Cipher {
    /// Encrypt `plaintext` for the secret `key` under `key_alias`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if the alias has no key or encryption fails.
    fn encrypt(&self, key_alias: &str, key: &str, plaintext: &str) -> Result<String>;

    /// Decrypt a ciphertext stored under the secret `key`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` for malformed or foreign
    /// ciphertext and `CipherError::ContextMismatch` if it was encrypted
    /// for a different key.
    fn decrypt(&self, key: &str, ciphertext: &str) -> Result<String>;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}

impl<C: Cipher + ?Sized> Cipher for Box<C> {
    fn encrypt(&self, key_alias: &str, key: &str, plaintext: &str) -> Result<String> {
        (**self).encrypt(key_alias, key, plaintext)
    }

    fn decrypt(&self, key: &str, ciphertext: &str) -> Result<String> {
        (**self).decrypt(key, ciphertext)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
