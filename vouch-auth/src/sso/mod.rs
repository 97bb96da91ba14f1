//! Federated OIDC login.
//!
//! The coordinator drives an authorization-code handshake against an
//! external identity provider: it builds the authorization redirect URL,
//! exchanges the returned code for tokens, verifies the ID token against
//! the provider's published keys, and delivers the resulting claim set as a
//! single-shot ticket. Claim normalization then reconciles the raw provider
//! claims into the canonical display-name claim.
//!
//! The handshake spans an external redirect round trip owned by the
//! provider and the hosting transport; the only suspension points here are
//! the network calls and the bounded [`TicketWait::wait`]. Nothing retries:
//! a failed handshake surfaces as [`HandshakeError`] and a new attempt is a
//! user-initiated new login.

mod error;
mod handshake;
mod jwks;
mod normalize;
mod settings;
mod verify;

pub use error::HandshakeError;
pub use handshake::{
    CompletedTicket, LoginCoordinator, ProviderEndpoints, TicketSlot, TicketWait, ticket_slot,
};
pub use jwks::JwksKeyStore;
pub use normalize::normalize;
pub use settings::{OidcSettings, OidcSettingsBuilder};
pub use verify::{IdTokenVerifier, JwksVerifier};
