//! The backend session-issuance contract.

use crate::{AuthError, IdentityToken};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// User record returned by the backend exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: u64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Application session credentials issued for one identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: SessionUser,
}

/// Session issuance and invalidation against the application backend.
///
/// Implemented by the REST client in `mailbridge-api`; the orchestrator only
/// depends on this trait so tests can substitute a scripted backend.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Exchange an identity token for an application session.
    ///
    /// An HTTP 401 from the backend maps to [`AuthError::InvalidCredentials`];
    /// every other failure maps to [`AuthError::ExchangeFailed`] carrying the
    /// backend's detail message when one is present.
    async fn exchange(&self, id_token: IdentityToken) -> Result<SessionTokens, AuthError>;

    /// Invalidate the current application session.
    async fn invalidate(&self) -> Result<(), AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_tokens_deserialize() {
        let json = r#"{
            "access_token": "app-access",
            "refresh_token": "app-refresh",
            "user": {"id": 7, "email": "alice@example.com", "full_name": "Alice Doe"}
        }"#;
        let tokens: SessionTokens = serde_json::from_str(json).unwrap();
        assert_eq!(tokens.access_token, "app-access");
        assert_eq!(tokens.refresh_token.as_deref(), Some("app-refresh"));
        assert_eq!(tokens.user.email, "alice@example.com");
    }

    #[test]
    fn test_session_user_without_full_name() {
        let json = r#"{"id": 1, "email": "svc@example.com"}"#;
        let user: SessionUser = serde_json::from_str(json).unwrap();
        assert!(user.full_name.is_none());
    }
}
