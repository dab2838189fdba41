//! Backend request plumbing.

use crate::auth::AuthApi;
use crate::cost_centers::CostCentersApi;
use crate::drafts::DraftsApi;
use crate::error::{ApiError, ApiResult};
use crate::mailbox::MailboxApi;
use crate::templates::TemplatesApi;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::RwLock;
use tracing::debug;
use url::Url;

/// HTTP client for the Mailbridge backend.
///
/// Holds the base URL and the application bearer credential. The credential
/// is installed by a successful session exchange and cleared on sign-out;
/// while present it is attached to every request.
///
/// # Example
///
/// ```rust,ignore
/// use mailbridge_api::ApiClient;
///
/// let api = ApiClient::new("https://backend.example.com/api/")?;
/// let inbox = api.mailbox().inbox(&Default::default()).await?;
/// ```
pub struct ApiClient {
    http: Client,
    base_url: Url,
    bearer: RwLock<Option<String>>,
}

impl ApiClient {
    /// Create a client for the given backend base URL.
    pub fn new(base_url: impl AsRef<str>) -> ApiResult<Self> {
        Self::with_http_client(base_url, ClientBuilder::new())
    }

    /// Create a client with a custom `reqwest::ClientBuilder` (proxies,
    /// timeouts, TLS options).
    pub fn with_http_client(
        base_url: impl AsRef<str>,
        client_builder: ClientBuilder,
    ) -> ApiResult<Self> {
        let mut raw = base_url.as_ref().to_string();
        // Relative joins drop the last path segment without this.
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Self {
            http: client_builder.build()?,
            base_url: Url::parse(&raw)?,
            bearer: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Install the application access token. Subsequent requests carry it as
    /// a bearer credential.
    pub fn set_bearer(&self, token: impl Into<String>) {
        *self.bearer.write().unwrap() = Some(token.into());
    }

    /// Drop the application access token.
    pub fn clear_bearer(&self) {
        *self.bearer.write().unwrap() = None;
    }

    /// Whether an application access token is currently installed.
    pub fn has_bearer(&self) -> bool {
        self.bearer.read().unwrap().is_some()
    }

    /// Session exchange, sign-out, and the user directory.
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// E-mail template resource.
    pub fn templates(&self) -> TemplatesApi<'_> {
        TemplatesApi::new(self)
    }

    /// Cost center resource.
    pub fn cost_centers(&self) -> CostCentersApi<'_> {
        CostCentersApi::new(self)
    }

    /// Draft resource.
    pub fn drafts(&self) -> DraftsApi<'_> {
        DraftsApi::new(self)
    }

    /// Sending, inbox, outbox, and the transactions log.
    pub fn mailbox(&self) -> MailboxApi<'_> {
        MailboxApi::new(self)
    }

    pub(crate) fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.bearer.read().unwrap().as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check_response(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.authorize(request).send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let mut request = self.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send_json(request).await
    }

    /// GET an absolute URL, used to follow the backend's `next` page links.
    pub(crate) async fn get_json_at<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        debug!(%url, "GET");
        self.send_json(self.http.get(url)).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        self.send_json(self.http.post(url).json(body)).await
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "PUT");
        self.send_json(self.http.put(url).json(body)).await
    }

    pub(crate) async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "PATCH");
        self.send_json(self.http.patch(url).json(body)).await
    }

    /// POST with an empty JSON body, ignoring whatever the backend returns.
    pub(crate) async fn post_discard(&self, path: &str) -> ApiResult<()> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let request = self.http.post(url).json(&serde_json::json!({}));
        let response = self.authorize(request).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> ApiResult<()> {
        let url = self.endpoint(path)?;
        debug!(%url, "DELETE");
        let response = self.authorize(self.http.delete(url)).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let api = ApiClient::new("https://backend.example.com/api").unwrap();
        assert_eq!(api.base_url().as_str(), "https://backend.example.com/api/");
    }

    #[test]
    fn test_endpoint_joins_relative_paths() {
        let api = ApiClient::new("https://backend.example.com/api/").unwrap();
        let url = api.endpoint("email/templates/").unwrap();
        assert_eq!(url.as_str(), "https://backend.example.com/api/email/templates/");
    }

    #[test]
    fn test_bearer_lifecycle() {
        let api = ApiClient::new("https://backend.example.com/api/").unwrap();
        assert!(!api.has_bearer());
        api.set_bearer("app-token");
        assert!(api.has_bearer());
        api.clear_bearer();
        assert!(!api.has_bearer());
    }
}
