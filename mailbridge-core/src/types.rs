//! Shared domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity assertion issued by the identity provider.
///
/// The token is consumed exactly once by the backend exchange and is never
/// persisted by this layer. `Debug` and `Display` redact the value so it
/// cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Consume the token, yielding the raw bearer string for the exchange.
    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for IdentityToken {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdentityToken(***)")
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// The identity provider's cached account record.
///
/// `username` carries the signed-in e-mail address; `name` is the human
/// display name when the provider supplies one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AccountRef {
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into(), name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Read-through projection of an identity account.
///
/// Never independently owned: always derived from an [`AccountRef`] or from
/// the backend's session user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub display_name: Option<String>,
    pub username: String,
}

impl From<&AccountRef> for User {
    fn from(account: &AccountRef) -> Self {
        // The provider's username field is the e-mail address.
        Self {
            email: account.username.clone(),
            display_name: account.name.clone(),
            username: account.username.clone(),
        }
    }
}

/// The backend's cursor-linked pagination envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_token_redacted() {
        let token = IdentityToken::new("eyJhbGciOi.secret.payload");
        assert_eq!(format!("{token:?}"), "IdentityToken(***)");
        assert_eq!(token.to_string(), "***");
        assert_eq!(token.into_inner(), "eyJhbGciOi.secret.payload");
    }

    #[test]
    fn test_user_projection_from_account() {
        let account = AccountRef::new("alice@example.com").with_name("Alice Doe");
        let user = User::from(&account);
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.username, "alice@example.com");
        assert_eq!(user.display_name.as_deref(), Some("Alice Doe"));
    }

    #[test]
    fn test_page_deserialize() {
        let json = r#"{"count":3,"next":"https://api.example.com/x/?page=2","previous":null,"results":[1,2]}"#;
        let page: Page<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 3);
        assert!(!page.is_last());
        assert_eq!(page.results, vec![1, 2]);
    }
}
