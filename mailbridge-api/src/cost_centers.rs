//! Cost center resource: organizational recipient groups for bulk
//! addressing.

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::types::ApiUser;
use chrono::{DateTime, Utc};
use mailbridge_core::Page;
use serde::{Deserialize, Serialize};

const BASE_PATH: &str = "email/cost-centers/";

/// Whether an address receives directly or on copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Recipient,
    Cc,
}

/// One address attached to a cost center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostCenterEmail {
    pub id: u64,
    pub email: String,
    pub email_type: AddressKind,
    pub display_name: Option<String>,
    pub is_active: bool,
}

/// List-view record with aggregate counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostCenterSummary {
    pub id: u64,
    pub cost_center_code: String,
    pub cost_center_name: String,
    pub cost_center_name_ar: String,
    pub is_active: bool,
    pub email_count: u64,
    pub recipient_count: u64,
    pub cc_count: u64,
    pub created_at: DateTime<Utc>,
}

/// Full record with the attached address lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostCenterDetail {
    pub id: u64,
    pub cost_center_code: String,
    pub cost_center_name: String,
    pub cost_center_name_ar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_ar: Option<String>,
    pub is_active: bool,
    pub emails: Vec<CostCenterEmail>,
    pub recipients: Vec<String>,
    pub ccs: Vec<String>,
    pub created_by: ApiUser,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a cost center or replacing one with PUT.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateCostCenter {
    pub cost_center_code: String,
    pub cost_center_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_center_name_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_emails: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc_emails: Option<Vec<String>>,
}

/// Partial update payload; only the set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCostCenter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_center_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_center_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_center_name_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_emails: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc_emails: Option<Vec<String>>,
}

/// List filters; unset fields are left out of the query string.
#[derive(Debug, Clone, Default)]
pub struct CostCenterFilters {
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl CostCenterFilters {
    pub fn active_only() -> Self {
        Self { is_active: Some(true), ..Default::default() }
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(active) = self.is_active {
            query.push(("is_active", active.to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(ordering) = &self.ordering {
            query.push(("ordering", ordering.clone()));
        }
        query
    }
}

/// Handle for `/email/cost-centers/`.
///
/// Create and update calls can fail with HTTP 409 when the cost center code
/// is already taken; check [`ApiError::is_conflict`](crate::ApiError::is_conflict).
pub struct CostCentersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CostCentersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &CostCenterFilters) -> ApiResult<Page<CostCenterSummary>> {
        self.client.get_json(BASE_PATH, &filters.to_query()).await
    }

    pub async fn get(&self, id: u64) -> ApiResult<CostCenterDetail> {
        self.client.get_json(&format!("{BASE_PATH}{id}/"), &[]).await
    }

    pub async fn create(&self, cost_center: &CreateCostCenter) -> ApiResult<CostCenterDetail> {
        self.client.post_json(BASE_PATH, cost_center).await
    }

    /// Full replacement (PUT).
    pub async fn update(
        &self,
        id: u64,
        cost_center: &CreateCostCenter,
    ) -> ApiResult<CostCenterDetail> {
        self.client.put_json(&format!("{BASE_PATH}{id}/"), cost_center).await
    }

    /// Partial update (PATCH).
    pub async fn patch(&self, id: u64, updates: &UpdateCostCenter) -> ApiResult<CostCenterDetail> {
        self.client.patch_json(&format!("{BASE_PATH}{id}/"), updates).await
    }

    /// Soft-delete alternative: flip the active flag.
    pub async fn set_active(&self, id: u64, is_active: bool) -> ApiResult<CostCenterDetail> {
        self.patch(id, &UpdateCostCenter { is_active: Some(is_active), ..Default::default() }).await
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
    fn test_detail_deserialize() {
        let json = r#"{
            "id": 3,
            "cost_center_code": "FIN-100",
            "cost_center_name": "Finance",
            "cost_center_name_ar": "المالية",
            "is_active": true,
            "emails": [
                {"id": 1, "email": "fin@example.com", "email_type": "recipient",
                 "display_name": "Finance Desk", "is_active": true},
                {"id": 2, "email": "audit@example.com", "email_type": "cc",
                 "display_name": null, "is_active": true}
            ],
            "recipients": ["fin@example.com"],
            "ccs": ["audit@example.com"],
            "created_by": {"id": 9, "email": "admin@example.com",
                           "first_name": "Admin", "last_name": "User"},
            "created_at": "2025-01-10T12:00:00Z",
            "updated_at": "2025-02-01T12:00:00Z"
        }"#;
        let detail: CostCenterDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.emails.len(), 2);
        assert_eq!(detail.emails[1].email_type, AddressKind::Cc);
        assert_eq!(detail.recipients, vec!["fin@example.com"]);
    }

    #[test]
    fn test_filters_to_query() {
        let filters = CostCenterFilters {
            is_active: Some(false),
            search: Some("fin".into()),
            ordering: None,
        };
        assert_eq!(
            filters.to_query(),
            vec![("is_active", "false".to_string()), ("search", "fin".to_string())]
        );
    }

    #[test]
    fn test_create_payload_omits_unset_fields() {
        let create = CreateCostCenter {
            cost_center_code: "HR-200".into(),
            cost_center_name: "People".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&create).unwrap();
        assert_eq!(json, r#"{"cost_center_code":"HR-200","cost_center_name":"People"}"#);
    }
}
