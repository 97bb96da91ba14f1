//! OIDC provider settings.

use secrecy::SecretString;

use crate::config::ConfigError;

/// Scope every login requests; providers refuse plain OAuth2 without it.
const OPENID_SCOPE: &str = "openid";

/// Static configuration for one federated identity provider.
///
/// Established once per process (or per tenant) from trusted external
/// settings. The client secret is redacted in `Debug` output and zeroized
/// on drop.
#[derive(Debug, Clone)]
pub struct OidcSettings {
    domain: String,
    client_id: String,
    client_secret: SecretString,
    callback_path: String,
    scopes: Vec<String>,
    claims_issuer: Option<String>,
}

impl OidcSettings {
    /// Create a new builder.
    pub fn builder() -> OidcSettingsBuilder {
        OidcSettingsBuilder::default()
    }

    /// Provider domain, e.g. `tenant.auth.example.com`.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Provider authority: `https://{domain}`.
    pub fn authority(&self) -> String {
        format!("https://{}", self.domain)
    }

    /// OAuth client id registered with the provider.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }

    /// Fixed URL path the provider redirects back to after login.
    pub fn callback_path(&self) -> &str {
        &self.callback_path
    }

    /// The explicit scope set sent on every authorization request.
    ///
    /// Provider defaults are never relied on: the set always starts from
    /// what the builder was given, with `openid` guaranteed present.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Optional label identifying this provider on completed tickets.
    pub fn claims_issuer(&self) -> Option<&str> {
        self.claims_issuer.as_deref()
    }
}

/// Builder for validated [`OidcSettings`].
#[derive(Debug, Default, Clone)]
pub struct OidcSettingsBuilder {
    domain: Option<String>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    callback_path: Option<String>,
    scopes: Vec<String>,
    claims_issuer: Option<String>,
}

impl OidcSettingsBuilder {
    /// Set the provider domain (host only; the authority composes to
    /// `https://{domain}`).
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the OAuth client id.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the OAuth client secret.
    pub fn client_secret(mut self, client_secret: SecretString) -> Self {
        self.client_secret = Some(client_secret);
        self
    }

    /// Set the callback path the provider redirects back to.
    pub fn callback_path(mut self, path: impl Into<String>) -> Self {
        self.callback_path = Some(path.into());
        self
    }

    /// Add one scope to the explicit scope set.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Set the provider label stamped on completed tickets.
    pub fn claims_issuer(mut self, label: impl Into<String>) -> Self {
        self.claims_issuer = Some(label.into());
        self
    }

    /// Build the settings, validating required fields.
    ///
    /// The scope set is always made explicit here: whatever the builder was
    /// given, `openid` is prepended when missing and duplicates are
    /// dropped, so no code path ever depends on a provider's implicit
    /// default scopes.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the domain, client id or client
    /// secret is missing, or when the callback path does not begin with
    /// `/`. All of these are startup-fatal for the caller.
    pub fn build(self) -> Result<OidcSettings, ConfigError> {
        let domain = self
            .domain
            .filter(|d| !d.is_empty())
            .ok_or(ConfigError::MissingOidcDomain)?;
        let client_id = self
            .client_id
            .filter(|c| !c.is_empty())
            .ok_or(ConfigError::MissingClientId)?;
        let client_secret = self.client_secret.ok_or(ConfigError::MissingClientSecret)?;

        let callback_path = self.callback_path.unwrap_or_else(|| "/signin-oidc".to_string());
        if !callback_path.starts_with('/') {
            return Err(ConfigError::InvalidCallbackPath(callback_path));
        }

        let mut scopes = vec![OPENID_SCOPE.to_string()];
        for scope in self.scopes {
            if !scopes.contains(&scope) {
                scopes.push(scope);
            }
        }

        Ok(OidcSettings {
            domain,
            client_id,
            client_secret,
            callback_path,
            scopes,
            claims_issuer: self.claims_issuer,
        })
    }
}
