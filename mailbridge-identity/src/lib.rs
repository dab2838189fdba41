//! # mailbridge-identity
//!
//! Identity provider integration for Mailbridge.
//!
//! ## Overview
//!
//! This crate wraps an external identity provider client behind a narrow
//! contract and translates its failures into the SDK's closed error set:
//!
//! - [`IdentityClient`] - The provider library's surface (popup/redirect
//!   login, redirect completion, silent renewal, account cache, sign-out)
//! - [`IdentityBridge`] - Dependency-injected wrapper with an explicit
//!   `initialize`/`dispose` lifecycle and error translation
//! - [`ProviderConfig`] - Client id, tenant authority, redirect URIs, scopes
//! - [`MockIdentityClient`] - Scriptable client for tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mailbridge_identity::{IdentityBridge, ProviderConfig};
//! use std::sync::Arc;
//!
//! let config = ProviderConfig::new("client-id", "tenant-id");
//! let bridge = IdentityBridge::new(Arc::new(provider_client), config);
//! bridge.initialize().await?;
//!
//! match bridge.login_interactive(LoginMode::Popup).await? {
//!     InteractiveLogin::Token(token) => { /* exchange with the backend */ }
//!     InteractiveLogin::Redirected => { /* context is navigating away */ }
//! }
//! ```

pub mod bridge;
pub mod client;
pub mod config;
pub mod mock;

pub use bridge::{IdentityBridge, InteractiveLogin, LoginMode};
pub use client::{
    codes, AuthOutcome, IdentityClient, LoginRequest, LogoutRequest, ProviderError, SilentRequest,
};
pub use config::{CacheLocation, LoginPrompt, ProviderConfig};
pub use mock::MockIdentityClient;
