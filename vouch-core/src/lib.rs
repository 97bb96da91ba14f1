//! Canonical claim model shared across the Vouch workspace.
//!
//! A [`Claim`] is a (type, value) fact about an authenticated subject, e.g.
//! `(role, admin)`. A [`ClaimSet`] is the unordered collection of such facts
//! produced by successful token validation or by a completed federated
//! login. Both are plain data: no IO, no transport concerns.
//!
//! # Quick Start
//!
//! ```rust
//! use vouch_core::{ClaimSet, well_known};
//!
//! let mut claims = ClaimSet::new();
//! claims.add(well_known::RAW_NAME, "Kermit");
//! assert!(claims.has(well_known::RAW_NAME, "Kermit"));
//! ```

mod claims;
pub mod well_known;

pub use claims::{Claim, ClaimSet};
