//! Cipher backend selection.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::{Age, Cipher, KeyStore};
use crate::core::config::Settings;
use crate::error::{ConfigError, Error, Result};

/// Which cipher encrypts and decrypts values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CipherBackend {
    /// Local age keys (default)
    #[default]
    Age,
    /// AWS KMS
    AwsKms,
}

impl FromStr for CipherBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "age" => Ok(Self::Age),
            "aws-kms" | "kms" => Ok(Self::AwsKms),
            other => Err(ConfigError::UnknownBackend {
                kind: "cipher",
                name: other.to_string(),
            }
            .into()),
        }
    }
}

impl fmt::Display for CipherBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Age => "age",
            Self::AwsKms => "aws-kms",
        })
    }
}

/// Open the cipher selected by the settings.
///
/// # Errors
///
/// Returns `ConfigError::FeatureDisabled` for `aws-kms` in a build without
/// the `aws` feature, or the backend's connection error.
pub fn open(settings: &Settings) -> Result<Box<dyn Cipher>> {
    debug!(backend = %settings.cipher, "opening cipher");

    match settings.cipher {
        CipherBackend::Age => Ok(Box::new(Age::new(KeyStore::new(&settings.keys_dir)))),
        CipherBackend::AwsKms => {
            #[cfg(feature = "aws")]
            {
                let kms = super::kms::Kms::connect(settings.region.as_deref())?;
                Ok(Box::new(kms))
            }
            #[cfg(not(feature = "aws"))]
            {
                Err(ConfigError::FeatureDisabled("aws-kms".to_string()).into())
            }
        }
    }
}
