//! Well-known claim type constants.
//!
//! These strings are shared between the claim normalizer and any consumer
//! that reads identity (access-control policies, UI display). They must
//! match exactly what the identity provider emits; no case folding is
//! applied anywhere in the workspace.

/// Raw display-name claim type as emitted by OIDC providers.
pub const RAW_NAME: &str = "name";

/// Canonical display-name claim type the rest of the system reads.
///
/// After normalization a claim set carries at most one claim of this type,
/// and an existing value is never overwritten.
pub const DISPLAY_NAME: &str = "display_name";

/// Email address claim type.
pub const EMAIL: &str = "email";

/// Avatar URL claim type.
pub const PICTURE: &str = "picture";

/// Registered JWT subject claim.
pub const SUBJECT: &str = "sub";

/// Registered JWT issuer claim.
pub const ISSUER: &str = "iss";

/// Registered JWT audience claim.
pub const AUDIENCE: &str = "aud";

/// Registered JWT expiry claim.
pub const EXPIRY: &str = "exp";
