//! # mailbridge-core
//!
//! Core types and contracts shared across the Mailbridge client SDK.
//!
//! ## Overview
//!
//! This crate provides the foundational abstractions for the SDK:
//!
//! - [`AuthError`] / [`Result`] - The closed authentication error taxonomy
//! - [`IdentityToken`] - Opaque, consume-once identity assertion
//! - [`User`] / [`AccountRef`] - Identity projections
//! - [`SessionBackend`] - The backend session-issuance contract
//! - [`Page`] - The backend's pagination envelope
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mailbridge_core::{AuthError, IdentityToken, SessionBackend};
//!
//! // The orchestrator exchanges an identity token through any SessionBackend
//! let tokens = backend.exchange(token).await?;
//! println!("Welcome {}", tokens.user.full_name);
//! ```

pub mod backend;
pub mod error;
pub mod types;

pub use backend::{SessionBackend, SessionTokens, SessionUser};
pub use error::{AuthError, Result};
pub use types::{AccountRef, IdentityToken, Page, User};
