//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A secret key name (e.g., DATABASE_URL, API_KEY).
pub type SecretKey = String;

/// An encrypted secret value (base64 ciphertext).
///
/// Opaque to the reconciliation engine: only compared for equality.
pub type EncryptedValue = String;

/// A slash-separated namespace path (e.g., `production/web`).
pub type Namespace = String;

/// Name selecting an encryption key (KMS alias or local age key).
pub type KeyAlias = String;
