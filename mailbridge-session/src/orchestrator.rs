//! Coordinates the identity bridge with the backend session exchange.

use crate::notifier::{LogNavigator, LogNotifier, Navigator, Notifier};
use crate::state::{SessionState, SessionStore};
use mailbridge_core::{AuthError, SessionBackend, SessionTokens, SessionUser, User};
use mailbridge_identity::{IdentityBridge, InteractiveLogin, LoginMode};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Where logout lands the user.
pub const LOGIN_ENTRY_PATH: &str = "/login";

/// Where a completed boot-time redirect login lands the user.
pub const DEFAULT_POST_LOGIN_PATH: &str = "/surveys";

/// Result of [`SessionOrchestrator::login`].
#[derive(Debug)]
pub enum LoginOutcome {
    /// Popup login and exchange completed; the session is live.
    Completed(SessionTokens),
    /// Redirect login started; the surrounding context is navigating away
    /// and nothing after this call is guaranteed to run.
    Redirected,
    /// A login was already in flight; nothing happened.
    AlreadyInProgress,
}

enum RunLogin {
    Completed(SessionTokens),
    Redirected,
}

/// Drives the `Idle → LoggingIn → LoggedIn → LoggingOut` state machine.
///
/// Holds the identity bridge, the backend exchange, and the UI seams. One
/// orchestrator per session store; no cross-instance exclusion is provided.
pub struct SessionOrchestrator {
    bridge: Arc<IdentityBridge>,
    backend: Arc<dyn SessionBackend>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    store: Arc<SessionStore>,
    login_entry: String,
    default_target: String,
}

impl SessionOrchestrator {
    pub fn builder() -> SessionOrchestratorBuilder {
        SessionOrchestratorBuilder::default()
    }

    /// The shared state holder, for UI observation.
    pub fn store(&self) -> Arc<SessionStore> {
        self.store.clone()
    }

    /// Current observable snapshot.
    pub fn state(&self) -> SessionState {
        self.store.snapshot()
    }

    /// Interactive login followed by the backend exchange.
    ///
    /// No-op while another login is in flight. On success the session state
    /// is updated before the navigation to `redirect_target` fires. Every
    /// failure returns the session to idle, raises a classified notice, and
    /// propagates the error to the caller.
    #[instrument(skip(self))]
    pub async fn login(
        &self,
        redirect_target: &str,
        mode: LoginMode,
    ) -> Result<LoginOutcome, AuthError> {
        if !self.store.begin_login() {
            debug!("login already in progress");
            return Ok(LoginOutcome::AlreadyInProgress);
        }

        self.notifier.progress("Signing in...", "Contacting the identity provider...");

        match self.run_login(mode).await {
            Ok(RunLogin::Completed(tokens)) => {
                // Observable state first, navigation last.
                self.store.complete_login(session_user_projection(&tokens.user));
                self.notifier.close_progress();
                let name =
                    tokens.user.full_name.clone().unwrap_or_else(|| tokens.user.email.clone());
                self.notifier.success("Login Successful", &format!("Welcome {name}"));
                self.navigator.navigate(redirect_target);
                Ok(LoginOutcome::Completed(tokens))
            }
            Ok(RunLogin::Redirected) => {
                // The context is navigating away; release the guard in case
                // this flow survives after all.
                self.store.abandon_login();
                Ok(LoginOutcome::Redirected)
            }
            Err(err) => {
                self.store.abandon_login();
                self.notifier.close_progress();
                self.notifier.error("Login Error", &login_error_message(&err));
                Err(err)
            }
        }
    }

    async fn run_login(&self, mode: LoginMode) -> Result<RunLogin, AuthError> {
        let token = match self.bridge.login_interactive(mode).await? {
            InteractiveLogin::Redirected => return Ok(RunLogin::Redirected),
            InteractiveLogin::Token(token) => token,
        };
        let tokens = self.backend.exchange(token).await?;
        Ok(RunLogin::Completed(tokens))
    }

    /// Finalize a redirect login on start-up.
    ///
    /// Runs unconditionally at boot, so failures are logged and swallowed;
    /// the session simply stays signed out.
    #[instrument(skip(self))]
    pub async fn complete_redirect_login(&self) -> Option<SessionTokens> {
        let token = self.bridge.complete_redirect().await?;

        match self.backend.exchange(token).await {
            Ok(tokens) => {
                self.store.complete_login(session_user_projection(&tokens.user));
                let name =
                    tokens.user.full_name.clone().unwrap_or_else(|| tokens.user.email.clone());
                self.notifier.success("Login Successful", &format!("Welcome {name}"));
                self.navigator.navigate(&self.default_target);
                Some(tokens)
            }
            Err(err) => {
                warn!(%err, "redirect login completion failed");
                None
            }
        }
    }

    /// Sign out of the backend session first, then the identity provider.
    ///
    /// No-op while another logout is in flight. Local state is cleared no
    /// matter what the backend or the provider do, the session always ends
    /// idle, and the user always lands on the login entry point. Failures
    /// are reported as a generic notice, never propagated.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if !self.store.begin_logout() {
            debug!("logout already in progress");
            return;
        }

        self.notifier.progress("Logging out...", "Please wait");

        let backend_result = self.backend.invalidate().await;
        let provider_result = self.bridge.logout().await;

        // Local state goes regardless of what the remote calls returned.
        self.store.clear();
        self.notifier.close_progress();

        match backend_result.and(provider_result) {
            Ok(()) => {
                self.notifier.success("Logged Out", "You have been successfully logged out");
            }
            Err(err) => {
                warn!(%err, "logout failed");
                self.notifier.error("Logout Error", "Failed to logout. Please try again.");
            }
        }

        self.navigator.navigate(&self.login_entry);
    }

    /// Read the provider's cached status into the session state. Never
    /// fails; an unreachable provider reads as "not logged in". Does not
    /// disturb an in-flight login or logout.
    pub fn check_status(&self) -> bool {
        let logged_in = self.bridge.is_authenticated();
        let user = if logged_in { self.bridge.current_user() } else { None };
        self.store.apply_provider_status(logged_in, user);
        logged_in
    }

    /// Re-read the provider's account projection into the session state.
    pub fn refresh_user(&self) -> Option<User> {
        let user = self.bridge.current_user();
        self.store.apply_provider_status(user.is_some(), user.clone());
        user
    }
}

fn session_user_projection(user: &SessionUser) -> User {
    User {
        email: user.email.clone(),
        display_name: user.full_name.clone(),
        username: user.email.clone(),
    }
}

fn login_error_message(err: &AuthError) -> String {
    match err {
        AuthError::UserCancelled => "Login cancelled".to_string(),
        AuthError::PopupBlocked => "Popup blocked. Please allow popups for this site.".to_string(),
        AuthError::InvalidCredentials => "Invalid identity provider credentials".to_string(),
        AuthError::ExchangeFailed(detail) => detail.clone(),
        _ => "Login failed. Please try again.".to_string(),
    }
}

/// Builder for [`SessionOrchestrator`].
#[derive(Default)]
pub struct SessionOrchestratorBuilder {
    bridge: Option<Arc<IdentityBridge>>,
    backend: Option<Arc<dyn SessionBackend>>,
    notifier: Option<Arc<dyn Notifier>>,
    navigator: Option<Arc<dyn Navigator>>,
    store: Option<Arc<SessionStore>>,
    login_entry: Option<String>,
    default_target: Option<String>,
}

impl SessionOrchestratorBuilder {
    /// Set the identity bridge (required).
    pub fn bridge(mut self, bridge: Arc<IdentityBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Set the session backend (required).
    pub fn backend(mut self, backend: Arc<dyn SessionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the UI notifier (defaults to [`LogNotifier`]).
    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    /// Set the navigator (defaults to [`LogNavigator`]).
    pub fn navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Some(Arc::new(navigator));
        self
    }

    /// Share an existing session store (defaults to a fresh one).
    pub fn store(mut self, store: Arc<SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Override the logout landing path.
    pub fn login_entry(mut self, path: impl Into<String>) -> Self {
        self.login_entry = Some(path.into());
        self
    }

    /// Override the boot-time redirect landing path.
    pub fn default_target(mut self, path: impl Into<String>) -> Self {
        self.default_target = Some(path.into());
        self
    }

    pub fn build(self) -> Result<SessionOrchestrator, &'static str> {
        Ok(SessionOrchestrator {
            bridge: self.bridge.ok_or("bridge is required")?,
            backend: self.backend.ok_or("backend is required")?,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
            navigator: self.navigator.unwrap_or_else(|| Arc::new(LogNavigator)),
            store: self.store.unwrap_or_default(),
            login_entry: self.login_entry.unwrap_or_else(|| LOGIN_ENTRY_PATH.to_string()),
            default_target: self
                .default_target
                .unwrap_or_else(|| DEFAULT_POST_LOGIN_PATH.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_messages_classified_by_cause() {
        assert_eq!(login_error_message(&AuthError::UserCancelled), "Login cancelled");
        assert_eq!(
            login_error_message(&AuthError::ExchangeFailed("account disabled".into())),
            "account disabled"
        );
        assert_eq!(
            login_error_message(&AuthError::AuthFailed("boom".into())),
            "Login failed. Please try again."
        );
    }

    #[test]
    fn test_session_user_projection() {
        let user = session_user_projection(&SessionUser {
            id: 1,
            email: "alice@example.com".into(),
            full_name: Some("Alice Doe".into()),
        });
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.username, "alice@example.com");
        assert_eq!(user.display_name.as_deref(), Some("Alice Doe"));
    }
}
