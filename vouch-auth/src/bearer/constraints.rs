//! Validation constraints.

/// Which optional checks [`validate`](super::BearerValidator::validate)
/// applies beyond signature verification.
///
/// The default matches the deployed behavior this engine replaces: expiry
/// checking on, issuer and audience checking off. That is a weak posture;
/// issuer/audience pinning is a one-line, explicit opt-in via
/// [`require_issuer`](Self::require_issuer) /
/// [`require_audience`](Self::require_audience), and deployments that talk
/// to more than one token source should turn it on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConstraints {
    /// Compare the encoded issuer against [`expected_issuer`](Self::expected_issuer).
    pub check_issuer: bool,
    /// Exact issuer string a checked credential must carry.
    pub expected_issuer: Option<String>,
    /// Compare the encoded audience against [`expected_audience`](Self::expected_audience).
    pub check_audience: bool,
    /// Exact audience string a checked credential must carry.
    pub expected_audience: Option<String>,
    /// Reject credentials whose expiry is at or before the current time.
    pub check_expiry: bool,
}

impl Default for ValidationConstraints {
    fn default() -> Self {
        Self {
            check_issuer: false,
            expected_issuer: None,
            check_audience: false,
            expected_audience: None,
            check_expiry: true,
        }
    }
}

impl ValidationConstraints {
    /// Constraints with the default posture (expiry only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the credential to carry exactly this issuer.
    pub fn require_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.check_issuer = true;
        self.expected_issuer = Some(issuer.into());
        self
    }

    /// Require the credential to carry exactly this audience.
    pub fn require_audience(mut self, audience: impl Into<String>) -> Self {
        self.check_audience = true;
        self.expected_audience = Some(audience.into());
        self
    }

    /// Disable expiry checking. Useful for offline inspection tooling only.
    pub fn without_expiry_check(mut self) -> Self {
        self.check_expiry = false;
        self
    }
}
