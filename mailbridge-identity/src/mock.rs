//! Scriptable provider client for tests.

use crate::client::{
    codes, AuthOutcome, IdentityClient, LoginRequest, LogoutRequest, ProviderError, SilentRequest,
};
use async_trait::async_trait;
use mailbridge_core::{AccountRef, IdentityToken};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Convenience constructor for a completed provider authentication.
pub fn outcome(username: &str, id_token: &str) -> AuthOutcome {
    AuthOutcome {
        id_token: Some(IdentityToken::new(id_token)),
        access_token: None,
        account: AccountRef::new(username),
    }
}

#[derive(Default)]
struct Script {
    initialize: VecDeque<Result<(), ProviderError>>,
    popup: VecDeque<Result<AuthOutcome, ProviderError>>,
    redirect: VecDeque<Result<(), ProviderError>>,
    handle_redirect: VecDeque<Result<Option<AuthOutcome>, ProviderError>>,
    silent: VecDeque<Result<AuthOutcome, ProviderError>>,
    logout_popup: VecDeque<Result<(), ProviderError>>,
    logout_redirect: VecDeque<Result<(), ProviderError>>,
    accounts: Vec<AccountRef>,
}

#[derive(Default)]
struct Calls {
    initialize: AtomicUsize,
    popup: AtomicUsize,
    redirect: AtomicUsize,
    handle_redirect: AtomicUsize,
    silent: AtomicUsize,
    logout_popup: AtomicUsize,
    logout_redirect: AtomicUsize,
}

/// In-memory [`IdentityClient`] with scripted responses and call counters.
///
/// Successful logins push the account into the mock's cache and successful
/// sign-outs clear it, matching how a real provider client tracks accounts.
///
/// # Example
///
/// ```rust,ignore
/// let client = MockIdentityClient::new()
///     .with_popup(Ok(mock::outcome("alice@example.com", "id-token-1")));
/// let bridge = IdentityBridge::new(Arc::new(client), config);
/// ```
#[derive(Default)]
pub struct MockIdentityClient {
    script: Mutex<Script>,
    calls: Calls,
    popup_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockIdentityClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an `initialize` result (defaults to success when unscripted).
    pub fn with_initialize(self, result: Result<(), ProviderError>) -> Self {
        self.script.lock().unwrap().initialize.push_back(result);
        self
    }

    /// Queue a popup-login result.
    pub fn with_popup(self, result: Result<AuthOutcome, ProviderError>) -> Self {
        self.script.lock().unwrap().popup.push_back(result);
        self
    }

    /// Queue a redirect-login result.
    pub fn with_redirect(self, result: Result<(), ProviderError>) -> Self {
        self.script.lock().unwrap().redirect.push_back(result);
        self
    }

    /// Queue a redirect-completion result (defaults to `Ok(None)`).
    pub fn with_handle_redirect(self, result: Result<Option<AuthOutcome>, ProviderError>) -> Self {
        self.script.lock().unwrap().handle_redirect.push_back(result);
        self
    }

    /// Queue a silent-renewal result (defaults to `interaction_required`).
    pub fn with_silent(self, result: Result<AuthOutcome, ProviderError>) -> Self {
        self.script.lock().unwrap().silent.push_back(result);
        self
    }

    /// Queue a popup sign-out result (defaults to success).
    pub fn with_logout_popup(self, result: Result<(), ProviderError>) -> Self {
        self.script.lock().unwrap().logout_popup.push_back(result);
        self
    }

    /// Queue a redirect sign-out result (defaults to success).
    pub fn with_logout_redirect(self, result: Result<(), ProviderError>) -> Self {
        self.script.lock().unwrap().logout_redirect.push_back(result);
        self
    }

    /// Seed the provider's account cache.
    pub fn with_account(self, account: AccountRef) -> Self {
        self.script.lock().unwrap().accounts.push(account);
        self
    }

    /// Hold every popup login open until the returned handle is notified.
    /// Lets tests observe the in-flight `LoggingIn` state.
    pub fn hold_popup(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.popup_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn popup_calls(&self) -> usize {
        self.calls.popup.load(Ordering::SeqCst)
    }

    pub fn redirect_calls(&self) -> usize {
        self.calls.redirect.load(Ordering::SeqCst)
    }

    pub fn handle_redirect_calls(&self) -> usize {
        self.calls.handle_redirect.load(Ordering::SeqCst)
    }

    pub fn silent_calls(&self) -> usize {
        self.calls.silent.load(Ordering::SeqCst)
    }

    pub fn logout_popup_calls(&self) -> usize {
        self.calls.logout_popup.load(Ordering::SeqCst)
    }

    pub fn logout_redirect_calls(&self) -> usize {
        self.calls.logout_redirect.load(Ordering::SeqCst)
    }

    fn remember_account(&self, account: &AccountRef) {
        let mut script = self.script.lock().unwrap();
        if !script.accounts.iter().any(|a| a.username == account.username) {
            script.accounts.push(account.clone());
        }
    }
}

#[async_trait]
impl IdentityClient for MockIdentityClient {
    async fn initialize(&self) -> Result<(), ProviderError> {
        self.calls.initialize.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().initialize.pop_front().unwrap_or(Ok(()))
    }

    async fn login_popup(&self, _request: &LoginRequest) -> Result<AuthOutcome, ProviderError> {
        self.calls.popup.fetch_add(1, Ordering::SeqCst);
        let gate = self.popup_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let result = self.script.lock().unwrap().popup.pop_front().unwrap_or_else(|| {
            Err(ProviderError::new("unscripted", "no scripted popup response"))
        });
        if let Ok(outcome) = &result {
            self.remember_account(&outcome.account);
        }
        result
    }

    async fn login_redirect(&self, _request: &LoginRequest) -> Result<(), ProviderError> {
        self.calls.redirect.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().redirect.pop_front().unwrap_or(Ok(()))
    }

    async fn handle_redirect(&self) -> Result<Option<AuthOutcome>, ProviderError> {
        self.calls.handle_redirect.fetch_add(1, Ordering::SeqCst);
        let result = self.script.lock().unwrap().handle_redirect.pop_front().unwrap_or(Ok(None));
        if let Ok(Some(outcome)) = &result {
            self.remember_account(&outcome.account);
        }
        result
    }

    async fn acquire_token_silent(
        &self,
        _request: &SilentRequest,
    ) -> Result<AuthOutcome, ProviderError> {
        self.calls.silent.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().silent.pop_front().unwrap_or_else(|| {
            Err(ProviderError::new(codes::INTERACTION_REQUIRED, "interaction required"))
        })
    }

    fn accounts(&self) -> Vec<AccountRef> {
        self.script.lock().unwrap().accounts.clone()
    }

    async fn logout_popup(&self, _request: &LogoutRequest) -> Result<(), ProviderError> {
        self.calls.logout_popup.fetch_add(1, Ordering::SeqCst);
        let result = self.script.lock().unwrap().logout_popup.pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            self.script.lock().unwrap().accounts.clear();
        }
        result
    }

    async fn logout_redirect(&self, _request: &LogoutRequest) -> Result<(), ProviderError> {
        self.calls.logout_redirect.fetch_add(1, Ordering::SeqCst);
        let result = self.script.lock().unwrap().logout_redirect.pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            self.script.lock().unwrap().accounts.clear();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_counts_and_defaults() {
        let client = MockIdentityClient::new();
        assert!(client.handle_redirect().await.unwrap().is_none());
        assert_eq!(client.handle_redirect_calls(), 1);

        let silent = client
            .acquire_token_silent(&SilentRequest {
                scopes: vec![],
                account: AccountRef::new("a@example.com"),
            })
            .await;
        assert!(silent.unwrap_err().requires_interaction());
    }

    #[tokio::test]
    async fn test_successful_popup_caches_account() {
        let client = MockIdentityClient::new().with_popup(Ok(outcome("a@example.com", "tok")));
        let request = LoginRequest {
            scopes: vec![],
            prompt: crate::config::LoginPrompt::SelectAccount,
        };
        client.login_popup(&request).await.unwrap();
        assert_eq!(client.accounts().len(), 1);

        let logout = LogoutRequest {
            account: AccountRef::new("a@example.com"),
            post_logout_redirect_uri: None,
        };
        client.logout_popup(&logout).await.unwrap();
        assert!(client.accounts().is_empty());
    }
}
