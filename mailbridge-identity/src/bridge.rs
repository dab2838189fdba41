//! Dependency-injected wrapper over the provider client.

use crate::client::{
    codes, IdentityClient, LoginRequest, LogoutRequest, ProviderError, SilentRequest,
};
use crate::config::ProviderConfig;
use mailbridge_core::{AccountRef, AuthError, IdentityToken, User};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};

/// How interactive login reaches the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    /// Provider window over the current context; resolves with a token.
    Popup,
    /// Full-context navigation to the provider; the calling flow is
    /// abandoned.
    Redirect,
}

/// Result of [`IdentityBridge::login_interactive`].
#[derive(Debug)]
pub enum InteractiveLogin {
    /// Popup login completed with an identity token.
    Token(IdentityToken),
    /// Redirect login started; the surrounding context is navigating away
    /// and no further logic must run in this flow.
    Redirected,
}

/// Wraps the external identity provider client with an explicit lifecycle
/// and error translation into the SDK's closed error set.
///
/// The bridge is an owned, injected component: construct one per process,
/// call [`initialize`](Self::initialize) once at boot, and pass it by `Arc`
/// to the session orchestrator.
pub struct IdentityBridge {
    client: Arc<dyn IdentityClient>,
    config: ProviderConfig,
    init: OnceCell<()>,
    disposed: AtomicBool,
}

impl IdentityBridge {
    pub fn new(client: Arc<dyn IdentityClient>, config: ProviderConfig) -> Self {
        Self { client, config, init: OnceCell::new(), disposed: AtomicBool::new(false) }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// One-time provider client setup. Idempotent: repeat calls after a
    /// success are no-ops.
    pub async fn initialize(&self) -> Result<(), AuthError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(AuthError::InitFailed("identity bridge is disposed".into()));
        }
        self.init
            .get_or_try_init(|| async {
                self.client
                    .initialize()
                    .await
                    .map_err(|e| AuthError::InitFailed(e.to_string()))
            })
            .await?;
        Ok(())
    }

    /// Mark the bridge unusable. Subsequent operations fail with
    /// [`AuthError::InitFailed`] (or degrade to "not signed in" for the
    /// infallible readers).
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    fn ensure_ready(&self) -> Result<(), AuthError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(AuthError::InitFailed("identity bridge is disposed".into()));
        }
        if !self.init.initialized() {
            return Err(AuthError::InitFailed("initialize() has not completed".into()));
        }
        Ok(())
    }

    /// Interactive authentication.
    ///
    /// Popup mode resolves once the provider window completes and yields the
    /// identity token. Redirect mode yields
    /// [`InteractiveLogin::Redirected`]: the context is navigating away and
    /// the caller must not run anything after it.
    #[instrument(skip(self))]
    pub async fn login_interactive(&self, mode: LoginMode) -> Result<InteractiveLogin, AuthError> {
        self.ensure_ready()?;
        let request = LoginRequest::from_config(&self.config);

        match mode {
            LoginMode::Popup => {
                let outcome = self
                    .client
                    .login_popup(&request)
                    .await
                    .map_err(translate_interactive_error)?;
                let token = outcome.id_token.ok_or_else(|| {
                    AuthError::AuthFailed("no ID token received from identity provider".into())
                })?;
                debug!("popup login completed");
                Ok(InteractiveLogin::Token(token))
            }
            LoginMode::Redirect => {
                self.client
                    .login_redirect(&request)
                    .await
                    .map_err(|e| AuthError::AuthFailed(error_detail(&e)))?;
                Ok(InteractiveLogin::Redirected)
            }
        }
    }

    /// Finalize a pending redirect login. Invoked once on every start-up;
    /// runs unconditionally, so provider failures are logged and swallowed.
    pub async fn complete_redirect(&self) -> Option<IdentityToken> {
        if let Err(err) = self.ensure_ready() {
            warn!(%err, "skipping redirect completion");
            return None;
        }
        match self.client.handle_redirect().await {
            Ok(Some(outcome)) => match outcome.id_token {
                Some(token) => {
                    debug!("redirect login completed");
                    Some(token)
                }
                None => {
                    warn!("redirect response carried no ID token");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(code = %err.code, "failed to resolve redirect response");
                None
            }
        }
    }

    /// Non-interactive token renewal for the cached account. `None` when no
    /// account is cached or the provider demands an interactive step.
    pub async fn silent_token(&self) -> Option<IdentityToken> {
        if self.ensure_ready().is_err() {
            return None;
        }
        let account = self.current_account()?;
        let request = SilentRequest { scopes: self.config.scopes.clone(), account };

        match self.client.acquire_token_silent(&request).await {
            Ok(outcome) => outcome.into_token(),
            Err(err) if err.requires_interaction() => {
                debug!(code = %err.code, "silent renewal needs interaction");
                None
            }
            Err(err) => {
                warn!(code = %err.code, "silent token acquisition failed");
                None
            }
        }
    }

    /// The provider's cached account, if any.
    pub fn current_account(&self) -> Option<AccountRef> {
        if self.ensure_ready().is_err() {
            return None;
        }
        self.client.accounts().into_iter().next()
    }

    /// Whether the provider has an active cached account.
    pub fn is_authenticated(&self) -> bool {
        self.current_account().is_some()
    }

    /// Read-through projection of the cached account.
    pub fn current_user(&self) -> Option<User> {
        self.current_account().map(|account| User::from(&account))
    }

    /// Provider sign-out: popup first, falling back to a full-context
    /// redirect when the popup is blocked. Best-effort; the remote session
    /// may survive if both paths fail. No-op without a cached account.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.ensure_ready()?;
        let Some(account) = self.current_account() else {
            return Ok(());
        };
        let request = LogoutRequest {
            account,
            post_logout_redirect_uri: self.config.logout_return_uri().map(str::to_string),
        };

        match self.client.logout_popup(&request).await {
            Ok(()) => {
                debug!("provider sign-out completed");
                Ok(())
            }
            Err(err) if err.code == codes::POPUP_WINDOW_ERROR => {
                warn!("sign-out popup blocked, falling back to redirect");
                self.client
                    .logout_redirect(&request)
                    .await
                    .map_err(|e| AuthError::LogoutFailed(error_detail(&e)))
            }
            Err(err) => Err(AuthError::LogoutFailed(error_detail(&err))),
        }
    }
}

fn translate_interactive_error(err: ProviderError) -> AuthError {
    match err.code.as_str() {
        codes::USER_CANCELLED => AuthError::UserCancelled,
        codes::POPUP_WINDOW_ERROR => AuthError::PopupBlocked,
        _ => AuthError::AuthFailed(error_detail(&err)),
    }
}

fn error_detail(err: &ProviderError) -> String {
    if err.message.is_empty() {
        err.code.clone()
    } else {
        err.message.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_translate_deterministically() {
        let cancelled = translate_interactive_error(ProviderError::new(codes::USER_CANCELLED, ""));
        assert_eq!(cancelled, AuthError::UserCancelled);

        let blocked =
            translate_interactive_error(ProviderError::new(codes::POPUP_WINDOW_ERROR, "blocked"));
        assert_eq!(blocked, AuthError::PopupBlocked);
    }

    #[test]
    fn test_unknown_code_maps_to_auth_failed() {
        let err = translate_interactive_error(ProviderError::new("monitor_window_timeout", "timed out"));
        assert_eq!(err, AuthError::AuthFailed("timed out".into()));

        // Empty message falls back to the code itself.
        let err = translate_interactive_error(ProviderError::new("server_error", ""));
        assert_eq!(err, AuthError::AuthFailed("server_error".into()));
    }
}
