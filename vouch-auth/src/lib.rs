//! Authentication and authorization engine for the Vouch workspace.
//!
//! This crate decides whether an incoming request carries a valid,
//! non-expired, correctly signed bearer credential, whether the resulting
//! claims satisfy a named authorization policy, and reconciles claim sets
//! returned by a federated OIDC login into the canonical form the rest of
//! the system reads. HTTP routing and session transport are deliberately
//! out of scope; callers hand in header values and receive decisions.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use vouch_auth::{AuthConfig, PolicyDecision, ValidationConstraints, token_from_header};
//!
//! let config = AuthConfig::from_env()?;
//! let validator = config.validator();
//! let policies = config.policy_engine();
//!
//! let token = token_from_header(request_authorization_header)?;
//! let claims = validator.validate(token, &ValidationConstraints::default())?;
//! match policies.evaluate("CheeseburgerPolicy", &claims) {
//!     PolicyDecision::Allowed => { /* serve the request */ }
//!     PolicyDecision::Denied | PolicyDecision::UnknownPolicy => { /* 403 */ }
//! }
//! ```

pub mod bearer;
pub mod config;
pub mod policy;
pub mod sso;

pub use bearer::{
    BearerValidator, MAX_TOKEN_SIZE_BYTES, SigningKeySource, TokenRejection,
    ValidationConstraints, token_from_header,
};
pub use config::{AuthConfig, ConfigError};
pub use policy::{PolicyDecision, PolicyEngine, PolicyRule};
pub use sso::{
    CompletedTicket, HandshakeError, IdTokenVerifier, LoginCoordinator, OidcSettings,
    TicketSlot, TicketWait, normalize, ticket_slot,
};

// Re-export the shared claim model
pub use vouch_core::{Claim, ClaimSet, well_known};
