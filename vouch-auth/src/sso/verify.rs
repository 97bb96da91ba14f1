//! ID token verification.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use vouch_core::ClaimSet;

use super::{HandshakeError, JwksKeyStore};

/// Verifies the ID token returned by a completed handshake.
///
/// The trait is the seam between the coordinator and provider crypto:
/// production code uses the JWKS-backed [`JwksVerifier`], tests substitute
/// a stub that never touches the network.
#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    /// Verify a raw ID token and extract its claim set.
    async fn verify(&self, id_token: &str) -> Result<ClaimSet, HandshakeError>;

    /// The issuer this verifier accepts.
    fn issuer(&self) -> &str;
}

/// ID token verification against a provider's published key set.
pub struct JwksVerifier {
    issuer: String,
    audience: String,
    keys: Arc<JwksKeyStore>,
}

impl JwksVerifier {
    /// Create a verifier pinned to one issuer and audience.
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>, keys: Arc<JwksKeyStore>) -> Self {
        Self { issuer: issuer.into(), audience: audience.into(), keys }
    }
}

#[async_trait]
impl IdTokenVerifier for JwksVerifier {
    async fn verify(&self, id_token: &str) -> Result<ClaimSet, HandshakeError> {
        let header = decode_header(id_token)
            .map_err(|err| HandshakeError::IdTokenRejected(format!("header: {err}")))?;
        let kid = header
            .kid
            .ok_or_else(|| HandshakeError::IdTokenRejected("missing kid".to_string()))?;

        let key = self.keys.key_for(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = vec![Algorithm::RS256, Algorithm::ES256, Algorithm::EdDSA];
        // Providers disagree on the trailing slash; accept both spellings of
        // the configured issuer.
        let trimmed = self.issuer.trim_end_matches('/');
        validation.set_issuer(&[trimmed.to_string(), format!("{trimmed}/")]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;

        let data = decode::<serde_json::Map<String, serde_json::Value>>(id_token, &key, &validation)
            .map_err(|err| {
                tracing::debug!(error = %err, "identity token rejected");
                HandshakeError::IdTokenRejected(err.to_string())
            })?;

        Ok(ClaimSet::from_json_object(&data.claims))
    }

    fn issuer(&self) -> &str {
        &self.issuer
    }
}
