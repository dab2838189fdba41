//! E-mail template resource.

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::types::ApiUser;
use async_stream::try_stream;
use chrono::{DateTime, Utc};
use futures::Stream;
use mailbridge_core::Page;
use serde::{Deserialize, Serialize};
use url::Url;

const BASE_PATH: &str = "email/templates/";

/// Template grouping used for filtering and form dropdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateCategory {
    General,
    Announcement,
    Notification,
    Reminder,
    Report,
    Other,
}

impl Default for TemplateCategory {
    fn default() -> Self {
        TemplateCategory::General
    }
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::General => "GENERAL",
            TemplateCategory::Announcement => "ANNOUNCEMENT",
            TemplateCategory::Notification => "NOTIFICATION",
            TemplateCategory::Reminder => "REMINDER",
            TemplateCategory::Report => "REPORT",
            TemplateCategory::Other => "OTHER",
        }
    }
}

/// List-view template record. `created_by` is omitted by endpoints that
/// serve slim dropdown payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    pub category: TemplateCategory,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ApiUser>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full template record including subject and body content. Bilingual
/// fields carry the Arabic variants maintained alongside the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDetail {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_ar: Option<String>,
    pub body_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
    pub category: TemplateCategory,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ApiUser>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a template or replacing one with PUT.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateTemplate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_ar: Option<String>,
    pub body_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    pub category: TemplateCategory,
}

/// Partial update payload; only the set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TemplateCategory>,
}

/// List filters; unset fields are left out of the query string.
#[derive(Debug, Clone, Default)]
pub struct TemplateFilters {
    pub is_active: Option<bool>,
    pub category: Option<TemplateCategory>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl TemplateFilters {
    pub fn active_only() -> Self {
        Self { is_active: Some(true), ..Default::default() }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self { search: Some(query.into()), ..Default::default() }
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(active) = self.is_active {
            query.push(("is_active", active.to_string()));
        }
        if let Some(category) = self.category {
            query.push(("category", category.as_str().to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(ordering) = &self.ordering {
            query.push(("ordering", ordering.clone()));
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

/// Handle for `/email/templates/`.
pub struct TemplatesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TemplatesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// One page of templates.
    pub async fn list(&self, filters: &TemplateFilters) -> ApiResult<Page<TemplateSummary>> {
        self.client.get_json(BASE_PATH, &filters.to_query()).await
    }

    /// All templates matching the filters, following the backend's `next`
    /// links page by page.
    pub fn stream(
        &self,
        filters: TemplateFilters,
    ) -> impl Stream<Item = Result<TemplateSummary, ApiError>> + 'a {
        let client = self.client;
        try_stream! {
            let mut page: Page<TemplateSummary> =
                client.get_json(BASE_PATH, &filters.to_query()).await?;
            loop {
                for template in page.results.drain(..) {
                    yield template;
                }
                match page.next.take() {
                    Some(next) => {
                        let url = Url::parse(&next)?;
                        page = client.get_json_at(url).await?;
                    }
                    None => break,
                }
            }
        }
    }

    /// Full template content.
    pub async fn get(&self, id: u64) -> ApiResult<TemplateDetail> {
        self.client.get_json(&format!("{BASE_PATH}{id}/"), &[]).await
    }

    pub async fn create(&self, template: &CreateTemplate) -> ApiResult<TemplateDetail> {
        self.client.post_json(BASE_PATH, template).await
    }

    /// Full replacement (PUT).
    pub async fn update(&self, id: u64, template: &CreateTemplate) -> ApiResult<TemplateDetail> {
        self.client.put_json(&format!("{BASE_PATH}{id}/"), template).await
    }

    /// Partial update (PATCH).
    pub async fn patch(&self, id: u64, updates: &UpdateTemplate) -> ApiResult<TemplateDetail> {
        self.client.patch_json(&format!("{BASE_PATH}{id}/"), updates).await
    }

    /// Soft-delete alternative: flip the active flag.
    pub async fn set_active(&self, id: u64, is_active: bool) -> ApiResult<TemplateDetail> {
        self.patch(id, &UpdateTemplate { is_active: Some(is_active), ..Default::default() }).await
    }

    /// Permanent removal.
    pub async fn delete(&self, id: u64) -> ApiResult<()> {
        self.client.delete(&format!("{BASE_PATH}{id}/")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_to_query() {
        let filters = TemplateFilters {
            is_active: Some(true),
            category: Some(TemplateCategory::Announcement),
            search: Some("welcome".into()),
            ordering: Some("-created_at".into()),
            page: Some(2),
            page_size: Some(25),
        };
        assert_eq!(
            filters.to_query(),
            vec![
                ("is_active", "true".to_string()),
                ("category", "ANNOUNCEMENT".to_string()),
                ("search", "welcome".to_string()),
                ("ordering", "-created_at".to_string()),
                ("page", "2".to_string()),
                ("page_size", "25".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_filters_produce_no_query() {
        assert!(TemplateFilters::default().to_query().is_empty());
    }

    #[test]
    fn test_summary_tolerates_missing_created_by() {
        let json = r#"{
            "id": 4, "name": "Weekly digest", "category": "REPORT", "is_active": true,
            "created_at": "2025-03-01T08:00:00Z", "updated_at": "2025-03-02T09:30:00Z"
        }"#;
        let summary: TemplateSummary = serde_json::from_str(json).unwrap();
        assert!(summary.created_by.is_none());
        assert_eq!(summary.category, TemplateCategory::Report);
    }

    #[test]
    fn test_partial_update_serializes_only_set_fields() {
        let updates = UpdateTemplate { is_active: Some(false), ..Default::default() };
        assert_eq!(serde_json::to_string(&updates).unwrap(), r#"{"is_active":false}"#);
    }
}
