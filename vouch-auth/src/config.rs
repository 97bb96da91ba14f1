//! Startup configuration.
//!
//! All process-wide authentication state (the signing key, the policy
//! list, the optional federated login settings) lives in one explicit
//! [`AuthConfig`] constructed at startup and passed by reference to
//! whatever needs it. There are no ambient singletons, which keeps the
//! engine testable without a hosting framework.

use secrecy::SecretString;
use thiserror::Error;

use crate::bearer::{BearerValidator, SigningKeySource};
use crate::policy::{PolicyEngine, PolicyRule};
use crate::sso::OidcSettings;

/// Configuration failures. All of them are startup-fatal: the process must
/// refuse to start rather than run with an undefined security policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The signing key environment variable is not set.
    #[error("signing key environment variable '{0}' is not set")]
    MissingSigningKey(String),

    /// The signing key environment variable is set but empty.
    #[error("signing key environment variable '{0}' is empty")]
    EmptySigningKey(String),

    /// Federated login is enabled but no provider domain was given.
    #[error("OIDC provider domain is required")]
    MissingOidcDomain,

    /// Federated login is enabled but no client id was given.
    #[error("OIDC client id is required")]
    MissingClientId,

    /// Federated login is enabled but no client secret was given.
    #[error("OIDC client secret is required")]
    MissingClientSecret,

    /// The callback path must be absolute.
    #[error("callback path '{0}' must begin with '/'")]
    InvalidCallbackPath(String),
}

/// Process-wide authentication configuration.
///
/// Read-mostly after construction; the contained signing key and policy
/// list are shared read-only across request handlers.
#[derive(Debug)]
pub struct AuthConfig {
    signing_key: SigningKeySource,
    policies: Vec<PolicyRule>,
    oidc: Option<OidcSettings>,
}

impl AuthConfig {
    /// Environment variable holding the bearer signing key.
    pub const SIGNING_KEY_ENV: &'static str = "VOUCH_SIGNING_KEY";
    /// Environment variable holding the OIDC provider domain.
    pub const OIDC_DOMAIN_ENV: &'static str = "VOUCH_OIDC_DOMAIN";
    /// Environment variable holding the OIDC client id.
    pub const OIDC_CLIENT_ID_ENV: &'static str = "VOUCH_OIDC_CLIENT_ID";
    /// Environment variable holding the OIDC client secret.
    pub const OIDC_CLIENT_SECRET_ENV: &'static str = "VOUCH_OIDC_CLIENT_SECRET";
    /// Environment variable overriding the OIDC callback path.
    pub const OIDC_CALLBACK_PATH_ENV: &'static str = "VOUCH_OIDC_CALLBACK_PATH";

    /// Build a config around an already-loaded signing key.
    pub fn new(signing_key: SigningKeySource) -> Self {
        Self { signing_key, policies: Vec::new(), oidc: None }
    }

    /// Load the configuration from the environment.
    ///
    /// The signing key is required. Federated login settings are read only
    /// when [`OIDC_DOMAIN_ENV`](Self::OIDC_DOMAIN_ENV) is set; a partially
    /// specified provider (domain without client id or secret) is a
    /// [`ConfigError`], not a silently disabled feature.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`]; callers should treat these as fatal and halt
    /// initialization.
    pub fn from_env() -> Result<Self, ConfigError> {
        let signing_key = SigningKeySource::from_env(Self::SIGNING_KEY_ENV)?;

        let oidc = match non_empty_var(Self::OIDC_DOMAIN_ENV) {
            None => None,
            Some(domain) => {
                let client_id =
                    non_empty_var(Self::OIDC_CLIENT_ID_ENV).ok_or(ConfigError::MissingClientId)?;
                let client_secret = non_empty_var(Self::OIDC_CLIENT_SECRET_ENV)
                    .map(SecretString::from)
                    .ok_or(ConfigError::MissingClientSecret)?;

                let mut builder = OidcSettings::builder()
                    .domain(domain)
                    .client_id(client_id)
                    .client_secret(client_secret)
                    .scope("name")
                    .scope("email")
                    .scope("picture");
                if let Some(path) = non_empty_var(Self::OIDC_CALLBACK_PATH_ENV) {
                    builder = builder.callback_path(path);
                }
                Some(builder.build()?)
            }
        };

        Ok(Self { signing_key, policies: Vec::new(), oidc })
    }

    /// Attach the policy list loaded from configuration.
    pub fn with_policies(mut self, policies: Vec<PolicyRule>) -> Self {
        self.policies = policies;
        self
    }

    /// Attach federated login settings.
    pub fn with_oidc(mut self, settings: OidcSettings) -> Self {
        self.oidc = Some(settings);
        self
    }

    /// The configured signing key.
    pub fn signing_key(&self) -> &SigningKeySource {
        &self.signing_key
    }

    /// The configured policy triples.
    pub fn policies(&self) -> &[PolicyRule] {
        &self.policies
    }

    /// Federated login settings, when configured.
    pub fn oidc(&self) -> Option<&OidcSettings> {
        self.oidc.as_ref()
    }

    /// A validator over this config's signing key.
    pub fn validator(&self) -> BearerValidator {
        BearerValidator::new(self.signing_key.clone())
    }

    /// A policy engine loaded with this config's policy list.
    pub fn policy_engine(&self) -> PolicyEngine {
        PolicyEngine::from_rules(self.policies.iter().cloned())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
