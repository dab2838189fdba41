//! Walkthrough of the full login → status → logout cycle against scripted
//! components. Run with `cargo run -p mailbridge-session --example sso_login`.

use async_trait::async_trait;
use mailbridge_core::{AuthError, IdentityToken, SessionBackend, SessionTokens, SessionUser};
use mailbridge_identity::{mock, IdentityBridge, LoginMode, MockIdentityClient, ProviderConfig};
use mailbridge_session::{LoginOutcome, SessionOrchestrator};
use std::sync::Arc;

/// Stand-in for the real backend exchange.
struct DemoBackend;

#[async_trait]
impl SessionBackend for DemoBackend {
    async fn exchange(&self, _id_token: IdentityToken) -> Result<SessionTokens, AuthError> {
        Ok(SessionTokens {
            access_token: "demo-access-token".into(),
            refresh_token: None,
            user: SessionUser {
                id: 1,
                email: "alice@example.com".into(),
                full_name: Some("Alice Doe".into()),
            },
        })
    }

    async fn invalidate(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let client = MockIdentityClient::new()
        .with_popup(Ok(mock::outcome("alice@example.com", "demo-id-token")));
    let bridge = Arc::new(IdentityBridge::new(
        Arc::new(client),
        ProviderConfig::new("demo-client-id", "demo-tenant-id")
            .with_redirect_uri("https://mail.example.com"),
    ));
    bridge.initialize().await?;

    let orchestrator =
        SessionOrchestrator::builder().bridge(bridge).backend(Arc::new(DemoBackend)).build()?;

    // Boot: resolve a pending redirect login, if any.
    orchestrator.complete_redirect_login().await;

    match orchestrator.login("/surveys", LoginMode::Popup).await? {
        LoginOutcome::Completed(tokens) => println!("signed in as {}", tokens.user.email),
        LoginOutcome::Redirected => return Ok(()),
        LoginOutcome::AlreadyInProgress => unreachable!("no concurrent login in this demo"),
    }

    println!("logged in: {}", orchestrator.state().is_logged_in());

    orchestrator.logout().await;
    println!("logged in after logout: {}", orchestrator.state().is_logged_in());

    Ok(())
}
