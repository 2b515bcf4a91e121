//! Local age cipher.
//!
//! Each key alias maps to an x25519 identity stored at
//! `<keys_dir>/<alias>.key`. Ciphertext is the base64 of the binary age
//! payload; the payload's plaintext is `key NUL value`.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use ::age::secrecy::ExposeSecret;
use ::age::x25519;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::Cipher;
use crate::error::{CipherError, Result};

const KEY_EXT: &str = "key";
const SEPARATOR: u8 = 0;

/// Directory of age identities, one file per key alias.
#[derive(Debug, Clone)]
pub struct KeyStore {
    dir: PathBuf,
}

impl KeyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, alias: &str) -> PathBuf {
        self.dir.join(format!("{alias}.{KEY_EXT}"))
    }

    /// Check if an identity exists for an alias.
    pub fn has_key(&self, alias: &str) -> bool {
        self.key_path(alias).exists()
    }

    /// Generate and store a new identity for an alias.
    ///
    /// Creates the key directory if needed and writes the key with
    /// restricted permissions (0600 on Unix).
    ///
    /// # Returns
    ///
    /// The public key (`age1...`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the key cannot be written.
    pub fn generate(&self, alias: &str) -> Result<String> {
        let identity = x25519::Identity::generate();
        let public_key = identity.to_public().to_string();

        fs::create_dir_all(&self.dir)?;
        let path = self.key_path(alias);
        let secret = identity.to_string();
        fs::write(&path, format!("{}\n", secret.expose_secret()))?;

        // Restrict permissions on key file (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        debug!(alias, path = %path.display(), "generated key");
        Ok(public_key)
    }

    /// Load the identity of an alias.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::NoKey` if the alias has no key file, or
    /// `CipherError::InvalidKey` if the file does not hold an age identity.
    pub fn load(&self, alias: &str) -> Result<x25519::Identity> {
        let path = self.key_path(alias);
        if !path.exists() {
            return Err(CipherError::NoKey(alias.to_string()).into());
        }
        parse_identity(alias, &path)
    }

    /// Load every identity in the key directory, ordered by alias.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the directory cannot be read, or
    /// `CipherError::InvalidKey` for a malformed key file.
    pub fn load_all(&self) -> Result<Vec<x25519::Identity>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(KEY_EXT) {
                paths.push(path);
            }
        }
        paths.sort();

        paths
            .iter()
            .map(|path| {
                let alias = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                parse_identity(&alias, path)
            })
            .collect()
    }
}

fn parse_identity(alias: &str, path: &Path) -> Result<x25519::Identity> {
    let contents = Zeroizing::new(fs::read_to_string(path)?);
    contents
        .trim()
        .parse::<x25519::Identity>()
        .map_err(|e| {
            CipherError::InvalidKey {
                alias: alias.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
}

/// Age-based cipher using the identities of a [`KeyStore`].
#[derive(Debug, Clone)]
pub struct Age {
    keys: KeyStore,
}

impl Age {
    pub fn new(keys: KeyStore) -> Self {
        Self { keys }
    }
}

impl Cipher for Age {
    fn name(&self) -> &'static str {
        "age"
    }

    fn encrypt(&self, key_alias: &str, key: &str, plaintext: &str) -> Result<String> {
        trace!(key_alias, key, plaintext_len = plaintext.len(), "encrypting");

        if key.as_bytes().contains(&SEPARATOR) {
            return Err(CipherError::EncryptionFailed(format!(
                "key {key:?} contains a NUL byte"
            ))
            .into());
        }

        let recipient = self.keys.load(key_alias)?.to_public();
        let encryptor =
            ::age::Encryptor::with_recipients(std::iter::once(&recipient as &dyn ::age::Recipient))
                .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        let mut framed = Zeroizing::new(Vec::with_capacity(key.len() + 1 + plaintext.len()));
        framed.extend_from_slice(key.as_bytes());
        framed.push(SEPARATOR);
        framed.extend_from_slice(plaintext.as_bytes());

        let mut encrypted = Vec::new();
        let mut writer = encryptor.wrap_output(&mut encrypted)?;
        writer.write_all(&framed)?;
        writer.finish()?;

        let encoded = STANDARD.encode(&encrypted);
        trace!(ciphertext_len = encoded.len(), "encrypted");
        Ok(encoded)
    }

    fn decrypt(&self, key: &str, ciphertext: &str) -> Result<String> {
        trace!(key, ciphertext_len = ciphertext.len(), "decrypting");

        let payload = STANDARD
            .decode(ciphertext.trim())
            .map_err(|e| CipherError::DecryptionFailed(format!("invalid base64: {e}")))?;

        let identities = self.keys.load_all()?;
        if identities.is_empty() {
            return Err(CipherError::DecryptionFailed(format!(
                "no keys in {}",
                self.keys.dir().display()
            ))
            .into());
        }

        let decryptor = ::age::Decryptor::new(payload.as_slice())
            .map_err(|e| CipherError::DecryptionFailed(e.to_string()))?;
        let mut reader = decryptor
            .decrypt(identities.iter().map(|i| i as &dyn ::age::Identity))
            .map_err(|e| CipherError::DecryptionFailed(e.to_string()))?;

        let mut framed = Zeroizing::new(Vec::new());
        reader.read_to_end(&mut framed)?;

        let split = framed
            .iter()
            .position(|b| *b == SEPARATOR)
            .ok_or_else(|| CipherError::DecryptionFailed("missing key context".to_string()))?;
        let (bound_key, value) = (&framed[..split], &framed[split + 1..]);

        if bound_key != key.as_bytes() {
            return Err(CipherError::ContextMismatch {
                expected: key.to_string(),
                actual: String::from_utf8_lossy(bound_key).into_owned(),
            }
            .into());
        }

        String::from_utf8(value.to_vec())
            .map_err(|e| CipherError::DecryptionFailed(format!("UTF-8 error: {e}")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    fn cipher() -> (TempDir, Age) {
        let dir = TempDir::new().unwrap();
        let keys = KeyStore::new(dir.path().join("keys"));
        keys.generate("strata").unwrap();
        (dir, Age::new(keys))
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let (_dir, cipher) = cipher();

        let encrypted = cipher.encrypt("strata", "API_KEY", "s3cret").unwrap();

        assert_ne!(encrypted, "s3cret");
        assert!(STANDARD.decode(&encrypted).is_ok());
        assert_eq!(cipher.decrypt("API_KEY", &encrypted).unwrap(), "s3cret");
    }

    #[test]
    fn test_empty_value() {
        let (_dir, cipher) = cipher();

        let encrypted = cipher.encrypt("strata", "EMPTY", "").unwrap();

        assert_eq!(cipher.decrypt("EMPTY", &encrypted).unwrap(), "");
    }

    #[test]
    fn test_ciphertext_bound_to_key() {
        let (_dir, cipher) = cipher();
        let encrypted = cipher.encrypt("strata", "DB_PASSWORD", "hunter2").unwrap();

        let err = cipher.decrypt("API_KEY", &encrypted).unwrap_err();

        assert!(matches!(
            err,
            Error::Cipher(CipherError::ContextMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_alias() {
        let (_dir, cipher) = cipher();

        let err = cipher.encrypt("other", "A", "1").unwrap_err();

        assert!(matches!(err, Error::Cipher(CipherError::NoKey(alias)) if alias == "other"));
    }

    #[test]
    fn test_decrypt_with_any_alias_key() {
        let (_dir, cipher) = cipher();
        cipher.keys.generate("prod").unwrap();

        let encrypted = cipher.encrypt("prod", "A", "1").unwrap();

        assert_eq!(cipher.decrypt("A", &encrypted).unwrap(), "1");
    }

    #[test]
    fn test_foreign_key_fails() {
        let (_dir, cipher) = cipher();
        let encrypted = cipher.encrypt("strata", "A", "1").unwrap();

        let (_other_dir, other) = self::cipher();

        assert!(matches!(
            other.decrypt("A", &encrypted),
            Err(Error::Cipher(CipherError::DecryptionFailed(_)))
        ));
    }

    #[test]
    fn test_not_base64() {
        let (_dir, cipher) = cipher();

        assert!(matches!(
            cipher.decrypt("A", "!!! not base64 !!!"),
            Err(Error::Cipher(CipherError::DecryptionFailed(_)))
        ));
    }

    #[test]
    fn test_invalid_key_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.key"), "not a key\n").unwrap();
        let keys = KeyStore::new(dir.path());

        assert!(matches!(
            keys.load("broken"),
            Err(Error::Cipher(CipherError::InvalidKey { .. }))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_key_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let keys = KeyStore::new(dir.path());
        keys.generate("strata").unwrap();

        let mode = fs::metadata(dir.path().join("strata.key"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
