//! Backend request errors.

use serde::Deserialize;

/// Error from a backend request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, body decode).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned HTTP {code}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status { code: u16, detail: Option<String> },

    /// A request URL could not be constructed.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl ApiError {
    /// Build a status error from a response body, pulling the backend's
    /// `detail` message out of the JSON error envelope when present.
    pub fn from_status(code: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail)
            .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()));
        ApiError::Status { code, detail }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The backend's own error message, when it sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP 401: the backend rejected the presented credential.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// HTTP 409: a uniqueness conflict (e.g. duplicate cost center code).
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_extracted_from_json_body() {
        let err = ApiError::from_status(400, r#"{"detail":"Token has expired"}"#);
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.detail(), Some("Token has expired"));
    }

    #[test]
    fn test_plain_text_body_becomes_detail() {
        let err = ApiError::from_status(502, "upstream unavailable");
        assert_eq!(err.detail(), Some("upstream unavailable"));
    }

    #[test]
    fn test_empty_body_has_no_detail() {
        let err = ApiError::from_status(500, "");
        assert!(err.detail().is_none());
        assert_eq!(err.to_string(), "backend returned HTTP 500: no detail");
    }

    #[test]
    fn test_status_predicates() {
        assert!(ApiError::from_status(401, "").is_unauthorized());
        assert!(ApiError::from_status(409, "").is_conflict());
        assert!(!ApiError::from_status(403, "").is_unauthorized());
    }
}
