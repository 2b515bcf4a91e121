//! AWS KMS cipher.
//!
//! Enable with `--features aws`.
//!
//! Values are encrypted with `alias/<key_alias>` and the encryption context
//! `{"key": <secret key>}`, then base64 encoded. KMS records the key id in
//! the ciphertext, so decryption needs only the secret key.

use aws_sdk_kms::error::DisplayErrorContext;
use aws_sdk_kms::primitives::Blob;
use aws_sdk_kms::Client;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::runtime::Runtime;
use tracing::trace;
use zeroize::Zeroizing;

use super::Cipher;
use crate::core::aws;
use crate::error::{CipherError, Result};

const CONTEXT_KEY: &str = "key";

/// Cipher backed by AWS Key Management Service.
pub struct Kms {
    rt: Runtime,
    client: Client,
}

impl std::fmt::Debug for Kms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kms").finish_non_exhaustive()
    }
}

impl Kms {
    /// Connect using the default credential chain.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the runtime cannot be started.
    pub fn connect(region: Option<&str>) -> Result<Self> {
        let rt = aws::runtime()?;
        let config = aws::load_config(&rt, region);
        let client = Client::new(&config);
        Ok(Self { rt, client })
    }
}

impl Cipher for Kms {
    fn name(&self) -> &'static str {
        "aws-kms"
    }

    fn encrypt(&self, key_alias: &str, key: &str, plaintext: &str) -> Result<String> {
        trace!(key_alias, key, plaintext_len = plaintext.len(), "encrypting with AWS KMS");

        let output = self
            .rt
            .block_on(
                self.client
                    .encrypt()
                    .key_id(format!("alias/{key_alias}"))
                    .plaintext(Blob::new(plaintext.as_bytes()))
                    .encryption_context(CONTEXT_KEY, key)
                    .send(),
            )
            .map_err(|e| CipherError::EncryptionFailed(DisplayErrorContext(&e).to_string()))?;

        let blob = output
            .ciphertext_blob()
            .ok_or_else(|| CipherError::EncryptionFailed("no ciphertext returned".into()))?;

        Ok(STANDARD.encode(blob.as_ref()))
    }

    fn decrypt(&self, key: &str, ciphertext: &str) -> Result<String> {
        trace!(key, ciphertext_len = ciphertext.len(), "decrypting with AWS KMS");

        let blob = STANDARD
            .decode(ciphertext.trim())
            .map_err(|e| CipherError::DecryptionFailed(format!("invalid base64: {e}")))?;

        let output = self
            .rt
            .block_on(
                self.client
                    .decrypt()
                    .ciphertext_blob(Blob::new(blob))
                    .encryption_context(CONTEXT_KEY, key)
                    .send(),
            )
            .map_err(|e| CipherError::DecryptionFailed(DisplayErrorContext(&e).to_string()))?;

        let plaintext = output
            .plaintext()
            .map(|blob| Zeroizing::new(blob.as_ref().to_vec()))
            .ok_or_else(|| CipherError::DecryptionFailed("no plaintext returned".into()))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|e| CipherError::DecryptionFailed(format!("UTF-8 error: {e}")).into())
    }
}
