//! Federated login errors.

use thiserror::Error;

/// Errors surfaced by the federated login handshake.
///
/// None of these are retried internally; a failed handshake reaches the
/// end user as a failed login, and any retry is a fresh user-initiated
/// attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    /// The provider's response could not be used: the code exchange failed
    /// or its payload could not be parsed into a raw claim set.
    #[error("login handshake failed: {0}")]
    HandshakeFailed(String),

    /// The ID token returned by the exchange did not verify.
    #[error("identity token rejected: {0}")]
    IdTokenRejected(String),

    /// The provider's key set could not be fetched.
    #[error("key set fetch failed: {0}")]
    JwksFetch(String),

    /// The provider's key set document could not be parsed.
    #[error("key set document invalid: {0}")]
    JwksParse(String),

    /// The ID token references a key the provider does not publish.
    #[error("no verification key for kid '{0}'")]
    KeyNotFound(String),

    /// The provider did not complete the handshake within the configured
    /// bound.
    #[error("login handshake timed out")]
    TimedOut,

    /// The enclosing request was aborted before the provider responded.
    #[error("login abandoned before the provider responded")]
    Cancelled,
}
