//! Login handshake coordination.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::oneshot;
use vouch_core::ClaimSet;

use super::{HandshakeError, IdTokenVerifier, JwksKeyStore, JwksVerifier, OidcSettings, normalize};

/// Provider endpoint URLs used by the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    /// Where the browser is sent to authenticate.
    pub authorization: String,
    /// Where the authorization code is exchanged for tokens.
    pub token: String,
    /// Where the provider publishes its verification keys.
    pub jwks: String,
}

impl ProviderEndpoints {
    /// Conventional endpoint layout under a provider authority.
    pub fn for_authority(authority: &str) -> Self {
        let base = authority.trim_end_matches('/');
        Self {
            authorization: format!("{base}/authorize"),
            token: format!("{base}/oauth/token"),
            jwks: format!("{base}/.well-known/jwks.json"),
        }
    }
}

/// Subset of the OIDC discovery document the coordinator needs.
#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    issuer: String,
    authorization_endpoint: String,
    token_endpoint: String,
    jwks_uri: String,
}

/// Provider response to the code exchange.
#[derive(Deserialize)]
struct TokenExchangeResponse {
    id_token: Option<String>,
    access_token: Option<String>,
}

/// Everything a completed handshake produced.
///
/// The raw tokens are retained for callers that need to pass them on; the
/// `Debug` impl redacts them so a ticket can be logged safely.
#[derive(Clone)]
pub struct CompletedTicket {
    /// Verified claims from the ID token, not yet normalized.
    pub claims: ClaimSet,
    /// The raw ID token as received from the provider.
    pub id_token: String,
    /// The access token, when the provider returned one.
    pub access_token: Option<String>,
    /// Label identifying which provider produced this ticket.
    pub provider: Option<String>,
}

impl fmt::Debug for CompletedTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletedTicket")
            .field("claims", &self.claims)
            .field("id_token", &"[REDACTED]")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("provider", &self.provider)
            .finish()
    }
}

/// Drives the authorization-code handshake against one identity provider.
///
/// Construction does no IO; the first network touch is the code exchange
/// (or an explicit [`from_discovery`](Self::from_discovery)). The
/// coordinator is cheap to share behind an `Arc` and has no mutable state.
pub struct LoginCoordinator {
    settings: OidcSettings,
    endpoints: ProviderEndpoints,
    verifier: Arc<dyn IdTokenVerifier>,
    client: reqwest::Client,
}

impl LoginCoordinator {
    /// Create a coordinator using the conventional endpoint layout under
    /// the settings' authority.
    pub fn new(settings: OidcSettings) -> Self {
        let endpoints = ProviderEndpoints::for_authority(&settings.authority());
        Self::with_endpoints(settings, endpoints)
    }

    /// Create a coordinator with explicit endpoints.
    pub fn with_endpoints(settings: OidcSettings, endpoints: ProviderEndpoints) -> Self {
        let client = reqwest::Client::new();
        let keys = Arc::new(JwksKeyStore::new(endpoints.jwks.clone(), client.clone()));
        let verifier = Arc::new(JwksVerifier::new(
            settings.authority(),
            settings.client_id().to_string(),
            keys,
        ));
        Self { settings, endpoints, verifier, client }
    }

    /// Create a coordinator by fetching the provider's discovery document.
    ///
    /// # Errors
    ///
    /// [`HandshakeError::HandshakeFailed`] when the document cannot be
    /// fetched or parsed.
    pub async fn from_discovery(settings: OidcSettings) -> Result<Self, HandshakeError> {
        let authority = settings.authority();
        let discovery_url = format!(
            "{}/.well-known/openid-configuration",
            authority.trim_end_matches('/')
        );

        let client = reqwest::Client::new();
        let document: DiscoveryDocument = client
            .get(&discovery_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| HandshakeError::HandshakeFailed(format!("discovery: {err}")))?
            .json()
            .await
            .map_err(|err| HandshakeError::HandshakeFailed(format!("discovery: {err}")))?;

        let endpoints = ProviderEndpoints {
            authorization: document.authorization_endpoint,
            token: document.token_endpoint,
            jwks: document.jwks_uri,
        };
        let keys = Arc::new(JwksKeyStore::new(endpoints.jwks.clone(), client.clone()));
        let verifier = Arc::new(JwksVerifier::new(
            document.issuer,
            settings.client_id().to_string(),
            keys,
        ));
        Ok(Self { settings, endpoints, verifier, client })
    }

    /// Substitute the ID token verifier. Intended for tests.
    pub fn with_verifier(mut self, verifier: Arc<dyn IdTokenVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    /// The settings this coordinator was configured with.
    pub fn settings(&self) -> &OidcSettings {
        &self.settings
    }

    /// The provider endpoints in use.
    pub fn endpoints(&self) -> &ProviderEndpoints {
        &self.endpoints
    }

    /// Build the authorization redirect URL for a new login attempt.
    ///
    /// `redirect_base` is the externally visible base URL of this service;
    /// the configured callback path is appended to it. The scope parameter
    /// is always the settings' explicit scope set.
    ///
    /// # Errors
    ///
    /// [`HandshakeError::HandshakeFailed`] when the authorization endpoint
    /// is not a valid URL (possible with a hostile discovery document).
    pub fn authorize_url(
        &self,
        redirect_base: &str,
        state: &str,
        nonce: &str,
    ) -> Result<String, HandshakeError> {
        let redirect_uri = format!(
            "{}{}",
            redirect_base.trim_end_matches('/'),
            self.settings.callback_path()
        );
        let url = reqwest::Url::parse_with_params(
            &self.endpoints.authorization,
            &[
                ("response_type", "code"),
                ("client_id", self.settings.client_id()),
                ("redirect_uri", redirect_uri.as_str()),
                ("scope", self.settings.scopes().join(" ").as_str()),
                ("state", state),
                ("nonce", nonce),
            ],
        )
        .map_err(|err| {
            HandshakeError::HandshakeFailed(format!("authorization endpoint: {err}"))
        })?;
        Ok(url.into())
    }

    /// Exchange an authorization code for tokens and verify the ID token.
    ///
    /// `redirect_uri` must be the exact value sent in the authorization
    /// request. Cancellation-safe: dropping the future aborts the in-flight
    /// request.
    ///
    /// # Errors
    ///
    /// [`HandshakeError::HandshakeFailed`] when the exchange itself fails
    /// or returns no ID token; verification errors propagate from the
    /// [`IdTokenVerifier`].
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<CompletedTicket, HandshakeError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", self.settings.client_id()),
            ("client_secret", self.settings.client_secret().expose_secret()),
        ];

        let response: TokenExchangeResponse = self
            .client
            .post(&self.endpoints.token)
            .form(&form)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| HandshakeError::HandshakeFailed(format!("code exchange: {err}")))?
            .json()
            .await
            .map_err(|err| HandshakeError::HandshakeFailed(format!("token response: {err}")))?;

        let id_token = response.id_token.ok_or_else(|| {
            HandshakeError::HandshakeFailed("provider returned no id_token".to_string())
        })?;

        let claims = self.verifier.verify(&id_token).await?;
        tracing::debug!(claims = claims.len(), "login handshake completed");

        Ok(CompletedTicket {
            claims,
            id_token,
            access_token: response.access_token,
            provider: self.settings.claims_issuer().map(str::to_string),
        })
    }

    /// Ingest a raw provider claim document received on ticket completion.
    ///
    /// Invoked once per completed external handshake. Parses the document
    /// into a claim set and applies [`normalize`], so the returned set
    /// carries the canonical display-name claim whenever one can be
    /// derived.
    ///
    /// # Errors
    ///
    /// [`HandshakeError::HandshakeFailed`] when the document is not a JSON
    /// object and therefore cannot be read as a claim set.
    pub fn on_ticket_received(
        &self,
        raw: &serde_json::Value,
    ) -> Result<ClaimSet, HandshakeError> {
        let object = raw.as_object().ok_or_else(|| {
            HandshakeError::HandshakeFailed("provider claims are not a JSON object".to_string())
        })?;
        Ok(normalize(ClaimSet::from_json_object(object)))
    }
}

/// Create the two halves of a single-shot ticket delivery.
///
/// The transport-facing side completes the [`TicketSlot`] when the provider
/// redirects back; the request-facing side awaits the [`TicketWait`] under
/// a timeout tied to the enclosing request's lifetime.
pub fn ticket_slot() -> (TicketSlot, TicketWait) {
    let (tx, rx) = oneshot::channel();
    (TicketSlot { tx }, TicketWait { rx })
}

/// Write half of a single-shot ticket delivery.
#[derive(Debug)]
pub struct TicketSlot {
    tx: oneshot::Sender<CompletedTicket>,
}

impl TicketSlot {
    /// Deliver the completed ticket.
    ///
    /// # Errors
    ///
    /// [`HandshakeError::Cancelled`] when the waiting side already gave up
    /// (request aborted or timed out).
    pub fn complete(self, ticket: CompletedTicket) -> Result<(), HandshakeError> {
        self.tx.send(ticket).map_err(|_| HandshakeError::Cancelled)
    }
}

/// Read half of a single-shot ticket delivery.
#[derive(Debug)]
pub struct TicketWait {
    rx: oneshot::Receiver<CompletedTicket>,
}

impl TicketWait {
    /// Wait for the ticket, bounded by `limit`.
    ///
    /// Dropping this future cancels the wait; the corresponding
    /// [`TicketSlot::complete`] then reports [`HandshakeError::Cancelled`].
    ///
    /// # Errors
    ///
    /// [`HandshakeError::TimedOut`] when the bound elapses first;
    /// [`HandshakeError::Cancelled`] when the slot was dropped without
    /// completing.
    pub async fn wait(self, limit: Duration) -> Result<CompletedTicket, HandshakeError> {
        match tokio::time::timeout(limit, self.rx).await {
            Ok(Ok(ticket)) => Ok(ticket),
            Ok(Err(_)) => Err(HandshakeError::Cancelled),
            Err(_) => Err(HandshakeError::TimedOut),
        }
    }
}
