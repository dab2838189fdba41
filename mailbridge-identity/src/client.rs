//! The narrow contract over the external identity provider client.

use crate::config::{LoginPrompt, ProviderConfig};
use async_trait::async_trait;
use mailbridge_core::{AccountRef, IdentityToken};

/// Provider error codes with dedicated handling.
///
/// Anything not listed here is treated as a generic provider failure.
pub mod codes {
    /// The user closed or dismissed the interactive prompt.
    pub const USER_CANCELLED: &str = "user_cancelled";
    /// The interactive window could not be opened.
    pub const POPUP_WINDOW_ERROR: &str = "popup_window_error";
    /// Silent renewal needs the user to grant consent.
    pub const CONSENT_REQUIRED: &str = "consent_required";
    /// Silent renewal needs any interactive step.
    pub const INTERACTION_REQUIRED: &str = "interaction_required";
    /// No usable cached session; the user must sign in again.
    pub const LOGIN_REQUIRED: &str = "login_required";
}

/// Raw failure from the provider client, carrying the provider's own code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into() }
    }

    /// True when the provider demands an interactive step before it will
    /// issue a token silently.
    pub fn requires_interaction(&self) -> bool {
        matches!(
            self.code.as_str(),
            codes::CONSENT_REQUIRED | codes::INTERACTION_REQUIRED | codes::LOGIN_REQUIRED
        )
    }
}

/// Interactive login parameters.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub scopes: Vec<String>,
    pub prompt: LoginPrompt,
}

impl LoginRequest {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self { scopes: config.scopes.clone(), prompt: config.prompt }
    }
}

/// Silent token renewal parameters for an already-known account.
#[derive(Debug, Clone)]
pub struct SilentRequest {
    pub scopes: Vec<String>,
    pub account: AccountRef,
}

/// Sign-out parameters.
#[derive(Debug, Clone)]
pub struct LogoutRequest {
    pub account: AccountRef,
    pub post_logout_redirect_uri: Option<String>,
}

/// Result of a completed provider authentication.
///
/// Mirrors the provider library's authentication result: the id token is the
/// identity assertion exchanged with the backend; the access token is only a
/// fallback when the provider omits a fresh id token on silent renewal.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub id_token: Option<IdentityToken>,
    pub access_token: Option<String>,
    pub account: AccountRef,
}

impl AuthOutcome {
    /// Best available identity assertion: the id token, else the access token.
    pub fn into_token(self) -> Option<IdentityToken> {
        self.id_token.or_else(|| self.access_token.map(IdentityToken::new))
    }
}

/// The external identity provider client.
///
/// One implementation per provider library; the bridge owns an
/// `Arc<dyn IdentityClient>` so tests can substitute
/// [`MockIdentityClient`](crate::MockIdentityClient).
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// One-time client setup. Must complete before any other call.
    async fn initialize(&self) -> Result<(), ProviderError>;

    /// Interactive login through the provider's popup window. Resolves when
    /// the window completes.
    async fn login_popup(&self, request: &LoginRequest) -> Result<AuthOutcome, ProviderError>;

    /// Interactive login through a full-context redirect. On success the
    /// surrounding context navigates away; callers must not run further
    /// logic after this resolves.
    async fn login_redirect(&self, request: &LoginRequest) -> Result<(), ProviderError>;

    /// Resolve a pending redirect login, if one is in flight. Returns `None`
    /// when the context was not entered through a provider redirect.
    async fn handle_redirect(&self) -> Result<Option<AuthOutcome>, ProviderError>;

    /// Non-interactive token renewal for a cached account.
    async fn acquire_token_silent(
        &self,
        request: &SilentRequest,
    ) -> Result<AuthOutcome, ProviderError>;

    /// Accounts currently present in the provider's cache.
    fn accounts(&self) -> Vec<AccountRef>;

    /// Sign out through the provider's popup window.
    async fn logout_popup(&self, request: &LogoutRequest) -> Result<(), ProviderError>;

    /// Sign out through a full-context redirect.
    async fn logout_redirect(&self, request: &LogoutRequest) -> Result<(), ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_interaction_codes() {
        for code in [codes::CONSENT_REQUIRED, codes::INTERACTION_REQUIRED, codes::LOGIN_REQUIRED] {
            assert!(ProviderError::new(code, "x").requires_interaction());
        }
        assert!(!ProviderError::new(codes::USER_CANCELLED, "x").requires_interaction());
        assert!(!ProviderError::new("server_error", "x").requires_interaction());
    }

    #[test]
    fn test_outcome_token_fallback() {
        let account = AccountRef::new("alice@example.com");
        let outcome = AuthOutcome {
            id_token: None,
            access_token: Some("access-123".into()),
            account: account.clone(),
        };
        assert_eq!(outcome.into_token().unwrap().into_inner(), "access-123");

        let outcome = AuthOutcome { id_token: None, access_token: None, account };
        assert!(outcome.into_token().is_none());
    }
}
