//! Provider key set (JWKS) fetching and caching.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use jsonwebtoken::DecodingKey;
use serde::Deserialize;

use super::HandshakeError;

/// Cached verification keys published by an identity provider.
///
/// Keys are fetched lazily and refreshed when a requested key id is not in
/// the cache (the provider rotated its keys) or when the refresh interval
/// has elapsed. Lookups are lock-free; a refresh replaces entries key by
/// key.
pub struct JwksKeyStore {
    keys: DashMap<String, DecodingKey>,
    jwks_uri: String,
    /// Unix seconds of the last completed refresh; 0 = never.
    last_refresh: AtomicU64,
    refresh_interval: Duration,
    client: reqwest::Client,
}

impl JwksKeyStore {
    /// Create a store over the given JWKS endpoint.
    pub fn new(jwks_uri: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            keys: DashMap::new(),
            jwks_uri: jwks_uri.into(),
            last_refresh: AtomicU64::new(0),
            refresh_interval: Duration::from_secs(3600),
            client,
        }
    }

    /// Override the refresh interval.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Look up a verification key by key id, refreshing once on a miss.
    ///
    /// # Errors
    ///
    /// [`HandshakeError::KeyNotFound`] when the provider does not publish
    /// the key even after a refresh; fetch/parse errors propagate from
    /// [`refresh`](Self::refresh).
    pub async fn key_for(&self, kid: &str) -> Result<DecodingKey, HandshakeError> {
        if let Some(key) = self.keys.get(kid) {
            return Ok(key.clone());
        }

        self.refresh().await?;

        self.keys
            .get(kid)
            .map(|key| key.clone())
            .ok_or_else(|| HandshakeError::KeyNotFound(kid.to_string()))
    }

    /// Fetch the key set document and replace the cached keys.
    ///
    /// Recent refreshes are debounced so a burst of unknown-kid lookups
    /// cannot hammer the provider.
    pub async fn refresh(&self) -> Result<(), HandshakeError> {
        let now = epoch_seconds();
        let last = self.last_refresh.load(Ordering::Relaxed);
        if last > 0 && now.saturating_sub(last) < self.refresh_interval.as_secs() / 2 {
            return Ok(());
        }

        tracing::debug!(uri = %self.jwks_uri, "fetching provider key set");

        let response = self
            .client
            .get(&self.jwks_uri)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| HandshakeError::JwksFetch(err.to_string()))?;

        let document: JwksDocument = response
            .json()
            .await
            .map_err(|err| HandshakeError::JwksParse(err.to_string()))?;

        self.keys.clear();
        let mut skipped = 0usize;
        for entry in document.keys {
            // Encryption keys and keyless entries are useless for signature
            // verification.
            if entry.use_.as_deref().is_some_and(|u| u != "sig") {
                skipped += 1;
                continue;
            }
            let Some(kid) = entry.kid.clone() else {
                skipped += 1;
                continue;
            };
            match entry.decoding_key() {
                Ok(key) => {
                    self.keys.insert(kid, key);
                }
                Err(err) => {
                    tracing::debug!(kid = %kid, error = %err, "skipping undecodable key");
                    skipped += 1;
                }
            }
        }

        self.last_refresh.store(now, Ordering::Relaxed);
        tracing::debug!(
            cached = self.keys.len(),
            skipped,
            "provider key set refreshed"
        );
        Ok(())
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys are cached yet.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn epoch_seconds() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

#[derive(Debug, Deserialize)]
struct JwksDocument {
    keys: Vec<JwkEntry>,
}

/// One published key; only the members needed to build a decoding key.
#[derive(Debug, Deserialize)]
struct JwkEntry {
    kty: String,
    kid: Option<String>,
    #[serde(rename = "use")]
    use_: Option<String>,
    /// RSA modulus.
    n: Option<String>,
    /// RSA exponent.
    e: Option<String>,
    /// EC / OKP x coordinate.
    x: Option<String>,
    /// EC y coordinate.
    y: Option<String>,
}

impl JwkEntry {
    fn decoding_key(&self) -> Result<DecodingKey, HandshakeError> {
        let missing = |member: &str, kty: &str| {
            HandshakeError::JwksParse(format!("{kty} key missing '{member}'"))
        };
        match self.kty.as_str() {
            "RSA" => {
                let n = self.n.as_ref().ok_or_else(|| missing("n", "RSA"))?;
                let e = self.e.as_ref().ok_or_else(|| missing("e", "RSA"))?;
                DecodingKey::from_rsa_components(n, e)
                    .map_err(|err| HandshakeError::JwksParse(err.to_string()))
            }
            "EC" => {
                let x = self.x.as_ref().ok_or_else(|| missing("x", "EC"))?;
                let y = self.y.as_ref().ok_or_else(|| missing("y", "EC"))?;
                DecodingKey::from_ec_components(x, y)
                    .map_err(|err| HandshakeError::JwksParse(err.to_string()))
            }
            "OKP" => {
                let x = self.x.as_ref().ok_or_else(|| missing("x", "OKP"))?;
                DecodingKey::from_ed_components(x)
                    .map_err(|err| HandshakeError::JwksParse(err.to_string()))
            }
            other => Err(HandshakeError::JwksParse(format!(
                "unsupported key type '{other}'"
            ))),
        }
    }
}
