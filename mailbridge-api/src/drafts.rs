//! Draft resource: compositions saved for later editing or sending.

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::mailbox::SendReport;
use crate::templates::TemplateSummary;
use crate::types::SendType;
use chrono::{DateTime, Utc};
use mailbridge_core::Page;
use serde::{Deserialize, Serialize};

const BASE_PATH: &str = "email/drafts/";

/// List-view draft record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSummary {
    pub id: u64,
    pub send_type: SendType,
    pub subject: String,
    pub draft_name: Option<String>,
    /// Template id, when the draft was started from one.
    pub template: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full draft record with body content and targeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftDetail {
    pub id: u64,
    pub send_type: SendType,
    pub subject: String,
    pub body_html: String,
    pub cost_center_ids: Option<Vec<u64>>,
    pub draft_name: Option<String>,
    pub template: Option<TemplateSummary>,
    pub template_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for saving a new draft.
#[derive(Debug, Clone, Serialize)]
pub struct SaveDraft {
    pub send_type: SendType,
    pub subject: String,
    pub body_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_center_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<u64>,
}

/// Partial update payload; only the set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_type: Option<SendType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_center_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<u64>,
}

/// Subject/body replacements applied when sending a draft.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SendDraftOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
}

/// List filters; unset fields are left out of the query string.
#[derive(Debug, Clone, Default)]
pub struct DraftFilters {
    pub send_type: Option<SendType>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl DraftFilters {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(send_type) = self.send_type {
            query.push(("send_type", send_type.as_str().to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            query.push(("page_size", page_size.to_string()));
        }
        query
    }
}

/// Handle for `/email/drafts/` and `/email/send-draft/{id}/`.
pub struct DraftsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DraftsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &DraftFilters) -> ApiResult<Page<DraftSummary>> {
        self.client.get_json(BASE_PATH, &filters.to_query()).await
    }

    pub async fn get(&self, id: u64) -> ApiResult<DraftDetail> {
        self.client.get_json(&format!("{BASE_PATH}{id}/"), &[]).await
    }

    pub async fn save(&self, draft: &SaveDraft) -> ApiResult<DraftDetail> {
        self.client.post_json(BASE_PATH, draft).await
    }

    /// Partial update (PATCH).
    pub async fn update(&self, id: u64, updates: &UpdateDraft) -> ApiResult<DraftDetail> {
        self.client.patch_json(&format!("{BASE_PATH}{id}/"), updates).await
    }

    pub async fn delete(&self, id: u64) -> ApiResult<()> {
        self.client.delete(&format!("{BASE_PATH}{id}/")).await
    }

    /// Send the draft, optionally overriding subject or body.
    /// `POST /email/send-draft/{id}/`.
    pub async fn send(&self, id: u64, overrides: &SendDraftOverrides) -> ApiResult<SendReport> {
        self.client.post_json(&format!("email/send-draft/{id}/"), overrides).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_draft_minimal_payload() {
        let draft = SaveDraft {
            send_type: SendType::Announcement,
            subject: "Quarterly update".into(),
            body_html: "<p>Hello</p>".into(),
            cost_center_ids: None,
            draft_name: None,
            template_id: None,
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert_eq!(
            json,
            r#"{"send_type":"ANNOUNCEMENT","subject":"Quarterly update","body_html":"<p>Hello</p>"}"#
        );
    }

    #[test]
    fn test_overrides_default_is_empty_object() {
        let json = serde_json::to_string(&SendDraftOverrides::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_detail_with_null_targeting() {
        let json = r#"{
            "id": 11, "send_type": "SPECIFIC", "subject": "Hi",
            "body_html": "<p>Hi</p>", "cost_center_ids": null,
            "draft_name": null, "template": null, "template_id": null,
            "created_at": "2025-05-05T10:00:00Z", "updated_at": "2025-05-05T10:05:00Z"
        }"#;
        let detail: DraftDetail = serde_json::from_str(json).unwrap();
        assert!(detail.cost_center_ids.is_none());
        assert!(detail.template.is_none());
    }

    #[test]
    fn test_filters_to_query() {
        let filters = DraftFilters {
            send_type: Some(SendType::Specific),
            search: None,
            page: Some(1),
            page_size: None,
        };
        assert_eq!(
            filters.to_query(),
            vec![("send_type", "SPECIFIC".to_string()), ("page", "1".to_string())]
        );
    }
}
