//! Signing key material.

use std::fmt;

use jsonwebtoken::DecodingKey;
use secrecy::{ExposeSecret, SecretString};

use crate::config::ConfigError;

/// Process-wide HMAC secret used to verify bearer-credential signatures.
///
/// Loaded once at startup and immutable thereafter. The secret is held in a
/// [`SecretString`], so it is zeroized on drop and redacted in `Debug`
/// output; the type deliberately implements neither `Serialize` nor
/// `Display`. Key material comes from the environment or a secret store;
/// a literal in code or committed configuration is a deployment defect,
/// which is why the only fallible constructor reads an environment
/// variable.
#[derive(Clone)]
pub struct SigningKeySource {
    secret: SecretString,
}

impl SigningKeySource {
    /// Load the signing key from an environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSigningKey`] when the variable is not
    /// set and [`ConfigError::EmptySigningKey`] when it is set but empty.
    /// Both are startup-fatal: the caller must refuse to serve rather than
    /// run with an undefined security policy.
    pub fn from_env(var: &str) -> Result<Self, ConfigError> {
        match std::env::var(var) {
            Ok(value) if !value.is_empty() => Ok(Self::from_secret(SecretString::from(value))),
            Ok(_) => Err(ConfigError::EmptySigningKey(var.to_string())),
            Err(_) => Err(ConfigError::MissingSigningKey(var.to_string())),
        }
    }

    /// Wrap already-loaded secret material (e.g. from a secret store client).
    pub fn from_secret(secret: SecretString) -> Self {
        Self { secret }
    }

    /// The verification key handed to the JWT library.
    pub(crate) fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.expose_secret().as_bytes())
    }
}

impl fmt::Debug for SigningKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKeySource")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
