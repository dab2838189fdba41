//! # mailbridge-api
//!
//! Typed REST client for the Mailbridge backend.
//!
//! ## Overview
//!
//! - [`ApiClient`] - Request plumbing: base URL, bearer credential, JSON
//!   helpers, and status-code translation
//! - [`auth`] - Session-token exchange, sign-out, and the user directory;
//!   [`ApiClient`] implements [`mailbridge_core::SessionBackend`]
//! - [`templates`] / [`cost_centers`] / [`drafts`] / [`mailbox`] - One
//!   stateless resource handle per backend resource
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mailbridge_api::ApiClient;
//!
//! let api = ApiClient::new("https://backend.example.com/api/")?;
//! let page = api.templates().list(&Default::default()).await?;
//! println!("{} templates", page.count);
//! ```

pub mod auth;
pub mod client;
pub mod cost_centers;
pub mod drafts;
pub mod error;
pub mod mailbox;
pub mod templates;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{ApiUser, EmailKind, EmailStatus, NumberedPage, SendType};
