//! UI-observable session state.

use mailbridge_core::User;
use std::sync::Mutex;

/// The session state machine.
///
/// A single value replaces independent `logging_in`/`logging_out` flags, so
/// impossible combinations (both at once) cannot be represented. At most one
/// login and one logout attempt are in flight at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthPhase {
    #[default]
    Idle,
    LoggingIn,
    LoggedIn,
    LoggingOut,
}

/// Observable snapshot of the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub phase: AuthPhase,
    pub user: Option<User>,
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        self.phase == AuthPhase::LoggedIn
    }

    pub fn is_logging_in(&self) -> bool {
        self.phase == AuthPhase::LoggingIn
    }

    pub fn is_logging_out(&self) -> bool {
        self.phase == AuthPhase::LoggingOut
    }
}

/// Shared holder for the session state. Ephemeral: lives for the process
/// and is re-derived from the identity bridge on start-up. Mutated only by
/// the orchestrator; one orchestrator per store.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.lock().unwrap().clone()
    }

    pub fn phase(&self) -> AuthPhase {
        self.inner.lock().unwrap().phase
    }

    pub fn user(&self) -> Option<User> {
        self.inner.lock().unwrap().user.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.phase() == AuthPhase::LoggedIn
    }

    /// Claim the login critical section. False when a login is already in
    /// flight, in which case nothing is changed.
    pub(crate) fn begin_login(&self) -> bool {
        let mut state = self.inner.lock().unwrap();
        if state.phase == AuthPhase::LoggingIn {
            return false;
        }
        state.phase = AuthPhase::LoggingIn;
        true
    }

    /// Claim the logout critical section. False when a logout is already in
    /// flight.
    pub(crate) fn begin_logout(&self) -> bool {
        let mut state = self.inner.lock().unwrap();
        if state.phase == AuthPhase::LoggingOut {
            return false;
        }
        state.phase = AuthPhase::LoggingOut;
        true
    }

    pub(crate) fn complete_login(&self, user: User) {
        let mut state = self.inner.lock().unwrap();
        state.phase = AuthPhase::LoggedIn;
        state.user = Some(user);
    }

    /// Abandon a login attempt: back to idle, cached user untouched.
    pub(crate) fn abandon_login(&self) {
        self.inner.lock().unwrap().phase = AuthPhase::Idle;
    }

    /// Unconditional local sign-out.
    pub(crate) fn clear(&self) {
        let mut state = self.inner.lock().unwrap();
        state.phase = AuthPhase::Idle;
        state.user = None;
    }

    /// Fold a provider status check into the state without disturbing an
    /// in-flight login or logout.
    pub(crate) fn apply_provider_status(&self, logged_in: bool, user: Option<User>) {
        let mut state = self.inner.lock().unwrap();
        if matches!(state.phase, AuthPhase::LoggingIn | AuthPhase::LoggingOut) {
            return;
        }
        if logged_in {
            state.phase = AuthPhase::LoggedIn;
            if user.is_some() {
                state.user = user;
            }
        } else {
            state.phase = AuthPhase::Idle;
            state.user = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User { email: email.into(), display_name: None, username: email.into() }
    }

    #[test]
    fn test_login_guard_is_exclusive() {
        let store = SessionStore::new();
        assert!(store.begin_login());
        assert!(!store.begin_login());
        store.abandon_login();
        assert!(store.begin_login());
    }

    #[test]
    fn test_logout_guard_is_exclusive() {
        let store = SessionStore::new();
        assert!(store.begin_logout());
        assert!(!store.begin_logout());
    }

    #[test]
    fn test_complete_login_sets_user_and_phase() {
        let store = SessionStore::new();
        store.begin_login();
        store.complete_login(user("alice@example.com"));
        let state = store.snapshot();
        assert!(state.is_logged_in());
        assert_eq!(state.user.unwrap().email, "alice@example.com");
    }

    #[test]
    fn test_clear_always_logs_out() {
        let store = SessionStore::new();
        store.complete_login(user("alice@example.com"));
        store.begin_logout();
        store.clear();
        let state = store.snapshot();
        assert_eq!(state.phase, AuthPhase::Idle);
        assert!(state.user.is_none());
    }

    #[test]
    fn test_status_does_not_disturb_inflight_login() {
        let store = SessionStore::new();
        store.begin_login();
        store.apply_provider_status(false, None);
        assert_eq!(store.phase(), AuthPhase::LoggingIn);
    }

    #[test]
    fn test_status_promotes_and_demotes_when_settled() {
        let store = SessionStore::new();
        store.apply_provider_status(true, Some(user("alice@example.com")));
        assert!(store.is_logged_in());

        store.apply_provider_status(false, None);
        assert_eq!(store.phase(), AuthPhase::Idle);
        assert!(store.user().is_none());
    }
}
