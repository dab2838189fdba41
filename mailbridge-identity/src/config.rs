//! Identity provider configuration.

use mailbridge_core::AuthError;
use serde::{Deserialize, Serialize};

/// Scopes requested on every interactive and silent token request.
pub const DEFAULT_SCOPES: &[&str] = &["openid", "profile", "email", "User.Read"];

/// Where the provider client keeps its token cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheLocation {
    /// Cache cleared when the session context ends.
    #[default]
    Session,
    /// Cache survives the session context.
    Persistent,
}

/// Account-selection behavior for interactive login.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginPrompt {
    /// Always ask which account to use.
    #[default]
    SelectAccount,
    /// Let the provider decide (may silently reuse a cached account).
    None,
}

/// Configuration for the identity provider client.
///
/// # Example
///
/// ```rust,ignore
/// use mailbridge_identity::ProviderConfig;
///
/// let config = ProviderConfig::new("client-id", "tenant-id")
///     .with_redirect_uri("https://mail.example.com");
/// assert_eq!(config.authority(), "https://login.microsoftonline.com/tenant-id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Application (client) id registered with the provider.
    pub client_id: String,
    /// Directory (tenant) id the authority URL is derived from.
    pub tenant_id: String,
    /// Where the provider returns the context after interactive login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    /// Where the provider returns the context after sign-out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_logout_redirect_uri: Option<String>,
    /// Requested token scopes.
    pub scopes: Vec<String>,
    /// Token cache placement.
    pub cache_location: CacheLocation,
    /// Interactive prompt behavior.
    pub prompt: LoginPrompt,
}

impl ProviderConfig {
    /// Create a config with the default scopes and a forced account picker.
    pub fn new(client_id: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            tenant_id: tenant_id.into(),
            redirect_uri: None,
            post_logout_redirect_uri: None,
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            cache_location: CacheLocation::default(),
            prompt: LoginPrompt::default(),
        }
    }

    /// Read configuration from `MAILBRIDGE_CLIENT_ID`, `MAILBRIDGE_TENANT_ID`
    /// and `MAILBRIDGE_REDIRECT_URI`.
    pub fn from_env() -> Result<Self, AuthError> {
        let client_id = std::env::var("MAILBRIDGE_CLIENT_ID")
            .map_err(|_| AuthError::InitFailed("MAILBRIDGE_CLIENT_ID is not set".into()))?;
        let tenant_id = std::env::var("MAILBRIDGE_TENANT_ID")
            .map_err(|_| AuthError::InitFailed("MAILBRIDGE_TENANT_ID is not set".into()))?;

        let mut config = Self::new(client_id, tenant_id);
        if let Ok(uri) = std::env::var("MAILBRIDGE_REDIRECT_URI") {
            config = config.with_redirect_uri(uri);
        }
        Ok(config)
    }

    /// Set the post-login redirect URI; also used after sign-out unless
    /// overridden with [`with_post_logout_redirect_uri`](Self::with_post_logout_redirect_uri).
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Set the post-logout redirect URI.
    pub fn with_post_logout_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.post_logout_redirect_uri = Some(uri.into());
        self
    }

    /// Replace the requested scopes.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the token cache placement.
    pub fn with_cache_location(mut self, location: CacheLocation) -> Self {
        self.cache_location = location;
        self
    }

    /// Set the interactive prompt behavior.
    pub fn with_prompt(mut self, prompt: LoginPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    /// Tenant authority URL the provider client authenticates against.
    pub fn authority(&self) -> String {
        format!("https://login.microsoftonline.com/{}", self.tenant_id)
    }

    /// Sign-out return target: the explicit post-logout URI, falling back to
    /// the login redirect URI.
    pub fn logout_return_uri(&self) -> Option<&str> {
        self.post_logout_redirect_uri.as_deref().or(self.redirect_uri.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authority_derived_from_tenant() {
        let config = ProviderConfig::new("app", "11111111-2222");
        assert_eq!(config.authority(), "https://login.microsoftonline.com/11111111-2222");
    }

    #[test]
    fn test_default_scopes_and_prompt() {
        let config = ProviderConfig::new("app", "tenant");
        assert_eq!(config.scopes, vec!["openid", "profile", "email", "User.Read"]);
        assert_eq!(config.prompt, LoginPrompt::SelectAccount);
        assert_eq!(config.cache_location, CacheLocation::Session);
    }

    #[test]
    fn test_logout_return_uri_fallback() {
        let config = ProviderConfig::new("app", "tenant").with_redirect_uri("https://app.example.com");
        assert_eq!(config.logout_return_uri(), Some("https://app.example.com"));

        let config = config.with_post_logout_redirect_uri("https://app.example.com/bye");
        assert_eq!(config.logout_return_uri(), Some("https://app.example.com/bye"));
    }
}
