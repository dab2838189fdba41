/// Authentication errors surfaced by the identity bridge and the session
/// orchestrator.
///
/// Provider-specific error codes are translated into this closed set; any
/// unrecognized provider failure maps to [`AuthError::AuthFailed`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The user dismissed the provider's interactive prompt.
    #[error("Login cancelled by user")]
    UserCancelled,

    /// The provider could not open its interactive window.
    #[error("Popup blocked. Please allow popups for this site.")]
    PopupBlocked,

    /// Generic provider failure.
    #[error("Identity provider login failed: {0}")]
    AuthFailed(String),

    /// Provider client initialization failed.
    #[error("Identity provider initialization failed: {0}")]
    InitFailed(String),

    /// The backend rejected the identity token with HTTP 401.
    #[error("Invalid identity credentials")]
    InvalidCredentials,

    /// The backend token exchange failed for any other reason.
    #[error("Session exchange failed: {0}")]
    ExchangeFailed(String),

    /// Backend or provider sign-out failed.
    #[error("Logout failed: {0}")]
    LogoutFailed(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(AuthError::UserCancelled.to_string(), "Login cancelled by user");
        assert_eq!(
            AuthError::ExchangeFailed("token expired".into()).to_string(),
            "Session exchange failed: token expired"
        );
    }

    #[test]
    fn test_invalid_credentials_distinct_from_auth_failed() {
        let invalid = AuthError::InvalidCredentials;
        let generic = AuthError::AuthFailed("server error".into());
        assert_ne!(invalid, generic);
        assert!(!matches!(invalid, AuthError::AuthFailed(_)));
    }
}
