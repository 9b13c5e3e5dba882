//! SDS Client
//!
//! Base client shared by the SDS resource clients. Holds the API root and
//! tenant, produces per-request headers, and validates every response.

use super::auth::SdsCredentials;
use super::http::{check_response, SdsHttpClient, SdsResponse};
use crate::error::{require, Result, SdsError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use url::Url;

pub const DEFAULT_API_VERSION: &str = "v1";

/// Base SDS client
#[derive(Clone, Debug)]
pub struct SdsClient {
    pub credentials: SdsCredentials,
    pub http: SdsHttpClient,
    api_root: String,
    tenant_id: String,
}

impl SdsClient {
    /// Create a new SDS client
    ///
    /// `resource` is the service base URL (e.g. `https://dat-b.osisoft.com`),
    /// the API root becomes `{resource}/api/{api_version}`.
    pub fn new(
        resource: &str,
        api_version: &str,
        tenant_id: &str,
        credentials: SdsCredentials,
    ) -> Result<Self> {
        let http = SdsHttpClient::new()?;
        Self::with_http(resource, api_version, tenant_id, credentials, http)
    }

    /// Same as [`SdsClient::new`] with a caller-supplied HTTP client
    pub fn with_http(
        resource: &str,
        api_version: &str,
        tenant_id: &str,
        credentials: SdsCredentials,
        http: SdsHttpClient,
    ) -> Result<Self> {
        let parsed = Url::parse(resource)
            .map_err(|e| SdsError::InvalidUrl(format!("Invalid resource '{}': {}", resource, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SdsError::InvalidUrl(format!(
                "Unsupported scheme '{}' in '{}'",
                parsed.scheme(),
                resource
            )));
        }
        require(tenant_id, "tenant_id")?;

        let api_root = format!(
            "{}/api/{}",
            resource.trim_end_matches('/'),
            api_version.trim_matches('/')
        );

        Ok(Self {
            credentials,
            http,
            api_root,
            tenant_id: tenant_id.to_string(),
        })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Headers sent with every SDS request
    pub async fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*; q=1"));

        if let Some(token) = self.credentials.get_token(&self.http).await? {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| SdsError::Auth("Access token is not a valid header value".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Send a request and validate the response with `context`
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        context: &str,
    ) -> Result<SdsResponse> {
        let headers = self.headers().await?;
        let response = self.http.send(method, url, headers, query, body).await?;
        check_response(&response, context)?;
        Ok(response)
    }

    /// GET and decode JSON
    pub async fn get(&self, url: &str, query: &[(&str, String)], context: &str) -> Result<Value> {
        self.execute(Method::GET, url, query, None, context).await?.json()
    }

    /// GET and return the body unparsed
    pub async fn get_text(
        &self,
        url: &str,
        query: &[(&str, String)],
        context: &str,
    ) -> Result<String> {
        Ok(self.execute(Method::GET, url, query, None, context).await?.body)
    }

    /// POST a JSON body and decode the JSON answer
    pub async fn post(&self, url: &str, body: &Value, context: &str) -> Result<Value> {
        self.execute(Method::POST, url, &[], Some(body), context).await?.json()
    }

    /// PUT a JSON body and decode the JSON answer
    pub async fn put(&self, url: &str, body: &Value, context: &str) -> Result<Value> {
        self.execute(Method::PUT, url, &[], Some(body), context).await?.json()
    }

    /// DELETE, discarding any body
    pub async fn delete(&self, url: &str, context: &str) -> Result<()> {
        self.execute(Method::DELETE, url, &[], None, context).await?;
        Ok(())
    }
}
