//! # mailbridge-session
//!
//! Session orchestration for Mailbridge.
//!
//! ## Overview
//!
//! The orchestrator coordinates the identity bridge with the backend's
//! session exchange and keeps the UI-observable session state:
//!
//! - [`SessionOrchestrator`] - login, redirect completion, logout, status
//! - [`AuthPhase`] / [`SessionStore`] - the `Idle → LoggingIn → LoggedIn →
//!   LoggingOut` state machine, one value instead of independent flags
//! - [`Notifier`] / [`Navigator`] - seams for the UI layer's dialogs and
//!   navigation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mailbridge_identity::LoginMode;
//! use mailbridge_session::{LoginOutcome, SessionOrchestrator};
//!
//! let orchestrator = SessionOrchestrator::builder()
//!     .bridge(bridge)
//!     .backend(api)
//!     .build()?;
//!
//! orchestrator.complete_redirect_login().await; // once at boot
//! match orchestrator.login("/surveys", LoginMode::Popup).await? {
//!     LoginOutcome::Completed(tokens) => println!("hi {}", tokens.user.email),
//!     LoginOutcome::Redirected => { /* context is navigating away */ }
//!     LoginOutcome::AlreadyInProgress => {}
//! }
//! ```

pub mod notifier;
pub mod orchestrator;
pub mod state;

pub use notifier::{LogNavigator, LogNotifier, Navigator, Notifier};
pub use orchestrator::{
    LoginOutcome, SessionOrchestrator, SessionOrchestratorBuilder, DEFAULT_POST_LOGIN_PATH,
    LOGIN_ENTRY_PATH,
};
pub use state::{AuthPhase, SessionState, SessionStore};
