//! Session issuance, sign-out, and the user directory.

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use mailbridge_core::{AuthError, IdentityToken, SessionBackend, SessionTokens};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const EXCHANGE_PATH: &str = "auth/azure-login";
const LOGOUT_PATH: &str = "auth/logout";
const USER_DIRECTORY_PATH: &str = "auth/users/names-emails/";

/// Shown when the backend fails without a usable message of its own.
const GENERIC_EXCHANGE_ERROR: &str = "login failed, please try again";

#[derive(Serialize)]
struct ExchangeRequest {
    id_token: String,
}

/// Directory entry: every active backend user with name and address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: u64,
    pub full_name: String,
    pub email: String,
}

/// Unpaginated user directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDirectory {
    pub users: Vec<DirectoryUser>,
    pub count: u64,
}

/// Handle for the backend's auth endpoints.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange an identity token for application session tokens.
    ///
    /// `POST /auth/azure-login`. The token is consumed by the call.
    pub async fn exchange(&self, id_token: IdentityToken) -> ApiResult<SessionTokens> {
        let request = ExchangeRequest { id_token: id_token.into_inner() };
        self.client.post_json(EXCHANGE_PATH, &request).await
    }

    /// Invalidate the backend session. `POST /auth/logout`.
    pub async fn logout(&self) -> ApiResult<()> {
        self.client.post_discard(LOGOUT_PATH).await
    }

    /// All active users with names and e-mail addresses.
    /// `GET /auth/users/names-emails/`.
    pub async fn user_directory(&self) -> ApiResult<UserDirectory> {
        self.client.get_json(USER_DIRECTORY_PATH, &[]).await
    }
}

/// Map an exchange failure into the closed auth taxonomy: 401 means the
/// identity token was rejected, anything else surfaces the backend's detail
/// message when present.
fn classify_exchange_error(err: ApiError) -> AuthError {
    if err.is_unauthorized() {
        return AuthError::InvalidCredentials;
    }
    let detail = err.detail().map(str::to_string).unwrap_or_else(|| match &err {
        ApiError::Status { .. } => GENERIC_EXCHANGE_ERROR.to_string(),
        other => other.to_string(),
    });
    AuthError::ExchangeFailed(detail)
}

#[async_trait]
impl SessionBackend for ApiClient {
    #[instrument(skip_all)]
    async fn exchange(&self, id_token: IdentityToken) -> Result<SessionTokens, AuthError> {
        match self.auth().exchange(id_token).await {
            Ok(tokens) => {
                debug!(user = %tokens.user.email, "session exchange completed");
                self.set_bearer(tokens.access_token.clone());
                Ok(tokens)
            }
            Err(err) => Err(classify_exchange_error(err)),
        }
    }

    #[instrument(skip_all)]
    async fn invalidate(&self) -> Result<(), AuthError> {
        let result = self.auth().logout().await;
        // The local credential is dropped even when the backend call fails.
        self.clear_bearer();
        result.map_err(|err| {
            AuthError::LogoutFailed(err.detail().map(str::to_string).unwrap_or_else(|| err.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401_classifies_as_invalid_credentials() {
        let err = classify_exchange_error(ApiError::from_status(401, r#"{"detail":"bad token"}"#));
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[test]
    fn test_backend_detail_surfaces_in_exchange_failure() {
        let err =
            classify_exchange_error(ApiError::from_status(403, r#"{"detail":"account disabled"}"#));
        assert_eq!(err, AuthError::ExchangeFailed("account disabled".into()));
    }

    #[test]
    fn test_status_without_detail_uses_generic_message() {
        let err = classify_exchange_error(ApiError::from_status(500, ""));
        assert_eq!(err, AuthError::ExchangeFailed(GENERIC_EXCHANGE_ERROR.into()));
    }

    #[test]
    fn test_user_directory_deserialize() {
        let json = r#"{"users":[{"id":1,"full_name":"Alice Doe","email":"alice@example.com"}],"count":1}"#;
        let directory: UserDirectory = serde_json::from_str(json).unwrap();
        assert_eq!(directory.count, 1);
        assert_eq!(directory.users[0].full_name, "Alice Doe");
    }
}
