//! Credential rejection taxonomy.

use thiserror::Error;

/// Why a bearer credential was rejected.
///
/// Every variant is a normal, recoverable caller result; rejection is the
/// expected outcome for hostile input and must never take the process down.
/// Messages are intentionally value-free; the offending credential is never
/// echoed back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenRejection {
    /// The credential is structurally unusable: absent, oversized, not a
    /// three-segment JWT, undecodable, or missing a claim a constraint
    /// requires (a token with no expiry while expiry checking is on lands
    /// here, not in a non-expiring fast path).
    #[error("malformed credential")]
    MalformedCredential,

    /// The signature does not verify against the configured signing key.
    #[error("credential signature rejected")]
    BadSignature,

    /// The current time is at or past the encoded expiry.
    #[error("credential expired")]
    Expired,

    /// The encoded issuer does not equal the expected issuer exactly.
    #[error("credential issuer rejected")]
    IssuerMismatch,

    /// The encoded audience does not equal the expected audience exactly.
    #[error("credential audience rejected")]
    AudienceMismatch,
}

impl From<jsonwebtoken::errors::Error> for TokenRejection {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::BadSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidIssuer => Self::IssuerMismatch,
            ErrorKind::InvalidAudience => Self::AudienceMismatch,
            ErrorKind::MissingRequiredClaim(claim) => match claim.as_str() {
                "iss" => Self::IssuerMismatch,
                "aud" => Self::AudienceMismatch,
                _ => Self::MalformedCredential,
            },
            _ => Self::MalformedCredential,
        }
    }
}
