//! HTTP utilities for SDS REST API calls

use crate::error::{Result, SdsError};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Response header the service uses to correlate a request with its logs
pub const OPERATION_ID_HEADER: &str = "Operation-Id";

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// A fully read response
///
/// The body is read to completion inside [`SdsHttpClient::send`], so the
/// connection is handed back before any validation happens.
#[derive(Debug, Clone)]
pub struct SdsResponse {
    pub status: StatusCode,
    pub url: String,
    pub operation_id: Option<String>,
    pub body: String,
}

impl SdsResponse {
    /// Decode the body as JSON. An empty body decodes to `Value::Null`.
    pub fn json(&self) -> Result<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body).map_err(|e| {
            SdsError::InvalidResponse(format!("Failed to parse response JSON from {}: {}", self.url, e))
        })
    }
}

/// HTTP client wrapper for SDS API calls
#[derive(Clone)]
pub struct SdsHttpClient {
    client: Client,
}

impl std::fmt::Debug for SdsHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdsHttpClient").finish_non_exhaustive()
    }
}

impl SdsHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("sds-dataviews/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub(crate) fn inner(&self) -> &Client {
        &self.client
    }

    /// Send a request and read the whole response body
    ///
    /// Query parameters are sent in the order given. Validation of the
    /// status is left to [`check_response`].
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<SdsResponse> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url).headers(headers);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        let status = response.status();
        let final_url = response.url().to_string();
        let operation_id = response
            .headers()
            .get(OPERATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.text().await?;

        Ok(SdsResponse {
            status,
            url: final_url,
            operation_id,
            body,
        })
    }
}

/// Fail with [`SdsError::Service`] when the response is not a 2xx
///
/// `context` names the failed operation and resource, e.g.
/// `Failed to get dataview, dv1.`
pub fn check_response(response: &SdsResponse, context: &str) -> Result<()> {
    if response.status.is_success() {
        return Ok(());
    }

    // Only log sanitized/truncated error body
    tracing::error!(
        "API error: {} - {}",
        response.status,
        sanitize_for_log(&response.body)
    );

    let reason = response.status.canonical_reason().unwrap_or("");
    Err(SdsError::Service {
        status: response.status.as_u16(),
        message: format!(
            "{} {}:{}. URL {}",
            context,
            response.status.as_u16(),
            reason,
            response.url
        ),
        operation_id: response.operation_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> SdsResponse {
        SdsResponse {
            status: StatusCode::from_u16(status).unwrap(),
            url: "https://sds.example/api/v1/Tenants/t/Namespaces/ns/Dataviews/dv1".to_string(),
            operation_id: Some("abc".to_string()),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_check_response_success() {
        assert!(check_response(&response(200, "{}"), "ctx").is_ok());
        assert!(check_response(&response(204, ""), "ctx").is_ok());
    }

    #[test]
    fn test_check_response_failure_message() {
        let err = check_response(&response(404, "missing"), "Failed to get dataview, dv1.")
            .unwrap_err();
        match err {
            SdsError::Service {
                status,
                message,
                operation_id,
            } => {
                assert_eq!(status, 404);
                assert!(message.starts_with("Failed to get dataview, dv1. 404:Not Found"));
                assert!(message.contains("/Dataviews/dv1"));
                assert_eq!(operation_id.as_deref(), Some("abc"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_body_decodes_to_null() {
        assert_eq!(response(200, "").json().unwrap(), Value::Null);
    }

    #[test]
    fn test_invalid_json_is_invalid_response() {
        let err = response(200, "not json").json().unwrap_err();
        assert!(matches!(err, SdsError::InvalidResponse(_)));
    }

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(200)));
        assert!(sanitized.contains("[truncated, 500 bytes total]"));
    }

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(sanitize_for_log("a\nb\tc"), "abc");
    }

    #[test]
    fn test_sanitize_respects_char_boundaries() {
        let body = "é".repeat(150);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated"));
    }
}
