//! Sending, inbox, outbox, and the transactions log.

use crate::client::ApiClient;
use crate::cost_centers::CostCenterSummary;
use crate::error::ApiResult;
use crate::templates::TemplateSummary;
use crate::types::{ApiUser, EmailKind, EmailStatus, NumberedPage, SendType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immediate send request. `Specific` sends must carry cost center ids;
/// `Announcement` sends go to every active cost center.
#[derive(Debug, Clone, Serialize)]
pub struct SendRequest {
    pub send_type: SendType,
    pub subject: String,
    pub body_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_center_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<u64>,
}

/// Per-cost-center outcome of a send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendDetail {
    pub success: bool,
    pub cost_center: String,
    pub recipients_count: u64,
    pub log_id: u64,
}

/// Overall outcome of a send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendReport {
    pub success: bool,
    pub sent_count: u64,
    pub failed_count: u64,
    pub total_cost_centers: u64,
    pub details: Vec<SendDetail>,
    pub sent_log_id: u64,
}

/// One logged e-mail, as served by outbox and transactions endpoints.
/// Body and recipient lists are only present on detail payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailLog {
    pub id: u64,
    pub user: ApiUser,
    pub cost_center: Option<CostCenterSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateSummary>,
    pub send_type: SendType,
    pub email_type: EmailKind,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_emails: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc_emails: Option<Vec<String>>,
    pub email_status: EmailStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
    pub recipient_count: u64,
    pub sent_at: DateTime<Utc>,
    /// Free-form backend annotations (retry count, origin draft, client info).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// One received e-mail with its per-recipient flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxItem {
    pub id: u64,
    pub email: EmailLog,
    pub sender: ApiUser,
    /// True when addressed directly, false when on copy.
    pub is_to: bool,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub is_starred: bool,
    pub is_archived: bool,
}

/// Acknowledgement for mark-read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadReceipt {
    pub success: bool,
    pub message: String,
}

/// New star state after a toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarReceipt {
    pub success: bool,
    pub is_starred: bool,
}

/// New archive state after a toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveReceipt {
    pub success: bool,
    pub is_archived: bool,
}

/// Inbox list filters.
#[derive(Debug, Clone, Default)]
pub struct InboxFilters {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub is_read: Option<bool>,
    pub is_starred: Option<bool>,
    pub search: Option<String>,
}

impl InboxFilters {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = paging_query(self.page, self.page_size);
        if let Some(is_read) = self.is_read {
            query.push(("is_read", is_read.to_string()));
        }
        if let Some(is_starred) = self.is_starred {
            query.push(("is_starred", is_starred.to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        query
    }
}

/// Outbox list filters.
#[derive(Debug, Clone, Default)]
pub struct OutboxFilters {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub email_status: Option<EmailStatus>,
    pub send_type: Option<SendType>,
    pub search: Option<String>,
}

impl OutboxFilters {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = paging_query(self.page, self.page_size);
        if let Some(status) = self.email_status {
            query.push(("email_status", status.as_str().to_string()));
        }
        if let Some(send_type) = self.send_type {
            query.push(("send_type", send_type.as_str().to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        query
    }
}

/// Transactions log filters. Admins see all activity, other users only
/// their own.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilters {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub email_status: Option<EmailStatus>,
    pub email_type: Option<EmailKind>,
    pub send_type: Option<SendType>,
    pub cost_center_id: Option<u64>,
    pub search: Option<String>,
}

impl TransactionFilters {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = paging_query(self.page, self.page_size);
        if let Some(status) = self.email_status {
            query.push(("email_status", status.as_str().to_string()));
        }
        if let Some(kind) = self.email_type {
            query.push(("email_type", kind.as_str().to_string()));
        }
        if let Some(send_type) = self.send_type {
            query.push(("send_type", send_type.as_str().to_string()));
        }
        if let Some(cost_center_id) = self.cost_center_id {
            query.push(("cost_center_id", cost_center_id.to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        query
    }
}

fn paging_query(page: Option<u64>, page_size: Option<u64>) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(page) = page {
        query.push(("page", page.to_string()));
    }
    if let Some(page_size) = page_size {
        query.push(("page_size", page_size.to_string()));
    }
    query
}

/// Handle for `/email/send/`, `/email/inbox/`, `/email/outbox/`, and
/// `/email/transactions/`.
pub struct MailboxApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MailboxApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Send immediately. `POST /email/send/`.
    pub async fn send(&self, request: &SendRequest) -> ApiResult<SendReport> {
        self.client.post_json("email/send/", request).await
    }

    pub async fn inbox(&self, filters: &InboxFilters) -> ApiResult<NumberedPage<InboxItem>> {
        self.client.get_json("email/inbox/", &filters.to_query()).await
    }

    /// Full received e-mail. Fetching the detail marks it read server-side.
    pub async fn inbox_detail(&self, id: u64) -> ApiResult<InboxItem> {
        self.client.get_json(&format!("email/inbox/{id}/"), &[]).await
    }

    /// `POST /email/inbox/{id}/mark-read/`.
    pub async fn mark_read(&self, id: u64) -> ApiResult<MarkReadReceipt> {
        self.client.post_json(&format!("email/inbox/{id}/mark-read/"), &serde_json::json!({})).await
    }

    /// `POST /email/inbox/{id}/star/`.
    pub async fn toggle_star(&self, id: u64) -> ApiResult<StarReceipt> {
        self.client.post_json(&format!("email/inbox/{id}/star/"), &serde_json::json!({})).await
    }

    /// `POST /email/inbox/{id}/archive/`.
    pub async fn toggle_archive(&self, id: u64) -> ApiResult<ArchiveReceipt> {
        self.client.post_json(&format!("email/inbox/{id}/archive/"), &serde_json::json!({})).await
    }

    pub async fn outbox(&self, filters: &OutboxFilters) -> ApiResult<NumberedPage<EmailLog>> {
        self.client.get_json("email/outbox/", &filters.to_query()).await
    }

    pub async fn outbox_detail(&self, id: u64) -> ApiResult<EmailLog> {
        self.client.get_json(&format!("email/outbox/{id}/"), &[]).await
    }

    pub async fn transactions(
        &self,
        filters: &TransactionFilters,
    ) -> ApiResult<NumberedPage<EmailLog>> {
        self.client.get_json("email/transactions/", &filters.to_query()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> &'static str {
        r#"{
            "id": 42,
            "user": {"id": 1, "email": "ops@example.com", "first_name": "Op", "last_name": "Erator"},
            "cost_center": null,
            "send_type": "ANNOUNCEMENT",
            "email_type": "SENT",
            "subject": "Maintenance window",
            "email_status": "SUCCESS",
            "recipient_count": 120,
            "sent_at": "2025-06-01T18:00:00Z",
            "metadata": {"sent_from_draft": true, "draft_id": 7}
        }"#
    }

    #[test]
    fn test_email_log_deserialize() {
        let log: EmailLog = serde_json::from_str(sample_log()).unwrap();
        assert_eq!(log.email_status, EmailStatus::Success);
        assert_eq!(log.email_type, EmailKind::Sent);
        assert!(log.cost_center.is_none());
        assert_eq!(log.metadata.unwrap()["draft_id"], 7);
    }

    #[test]
    fn test_inbox_item_deserialize() {
        let json = format!(
            r#"{{
                "id": 5,
                "email": {},
                "sender": {{"id": 1, "email": "ops@example.com", "first_name": "Op", "last_name": "Erator"}},
                "is_to": true, "is_read": false, "read_at": null,
                "is_starred": false, "is_archived": false
            }}"#,
            sample_log()
        );
        let item: InboxItem = serde_json::from_str(&json).unwrap();
        assert!(item.is_to);
        assert!(item.read_at.is_none());
    }

    #[test]
    fn test_send_request_specific_targeting() {
        let request = SendRequest {
            send_type: SendType::Specific,
            subject: "Hello".into(),
            body_html: "<p>Hello</p>".into(),
            cost_center_ids: Some(vec![3, 4]),
            template_id: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""cost_center_ids":[3,4]"#));
        assert!(!json.contains("template_id"));
    }

    #[test]
    fn test_transaction_filters_to_query() {
        let filters = TransactionFilters {
            email_status: Some(EmailStatus::Failed),
            email_type: Some(EmailKind::Sent),
            cost_center_id: Some(3),
            ..Default::default()
        };
        assert_eq!(
            filters.to_query(),
            vec![
                ("email_status", "FAILED".to_string()),
                ("email_type", "SENT".to_string()),
                ("cost_center_id", "3".to_string()),
            ]
        );
    }
}
