//! Wire types shared across backend resources.

use serde::{Deserialize, Serialize};

/// Backend user record embedded in resource payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiUser {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// How a send targets recipients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendType {
    /// Broadcast to every active cost center.
    Announcement,
    /// Targeted at an explicit set of cost centers.
    Specific,
}

/// Delivery state of a logged e-mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailStatus {
    Success,
    Failed,
    Pending,
}

/// Which ledger a logged e-mail belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailKind {
    Sent,
    Received,
    Draft,
    Inbox,
    Outbox,
}

/// Page-numbered envelope used by the mailbox endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberedPage<T> {
    pub count: u64,
    pub page: u64,
    pub page_size: u64,
    pub results: Vec<T>,
}

impl SendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendType::Announcement => "ANNOUNCEMENT",
            SendType::Specific => "SPECIFIC",
        }
    }
}

impl EmailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailStatus::Success => "SUCCESS",
            EmailStatus::Failed => "FAILED",
            EmailStatus::Pending => "PENDING",
        }
    }
}

impl EmailKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailKind::Sent => "SENT",
            EmailKind::Received => "RECEIVED",
            EmailKind::Draft => "DRAFT",
            EmailKind::Inbox => "INBOX",
            EmailKind::Outbox => "OUTBOX",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&SendType::Announcement).unwrap(), "\"ANNOUNCEMENT\"");
        assert_eq!(serde_json::to_string(&EmailStatus::Pending).unwrap(), "\"PENDING\"");
        let kind: EmailKind = serde_json::from_str("\"RECEIVED\"").unwrap();
        assert_eq!(kind, EmailKind::Received);
    }

    #[test]
    fn test_numbered_page_deserialize() {
        let json = r#"{"count":12,"page":2,"page_size":10,"results":["a","b"]}"#;
        let page: NumberedPage<String> = serde_json::from_str(json).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.results.len(), 2);
    }
}
