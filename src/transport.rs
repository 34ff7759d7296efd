//! Authenticated HTTP access, the second host boundary.
//!
//! The executor only sees the [`AuthenticatedRequester`] trait: one JSON
//! request in, one JSON response out. [`HttpTransport`] is the reqwest-backed
//! implementation an embedder uses outside the original host. No retries
//! happen at this layer; retry policy belongs to the transport's owner.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::credentials::VideoEditorApiCredential;
use crate::error::{NodeError, NodeResult};

/// Request timeout for outbound calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Maximum error-body length echoed into error messages.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Issues one authenticated request against the configured API.
#[async_trait]
pub trait AuthenticatedRequester: Send + Sync {
    /// Sends `body` (if any) to `path` under the credential's base URL and
    /// returns the parsed JSON response body.
    async fn request_json(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> NodeResult<serde_json::Value>;
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error: Option<ApiErrorDetail>,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// reqwest-backed transport bound to one stored credential.
pub struct HttpTransport {
    client: reqwest::Client,
    credential: VideoEditorApiCredential,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.credential.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Creates a transport for the given credential.
    pub fn new(credential: VideoEditorApiCredential) -> NodeResult<Self> {
        credential.validate()?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NodeError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, credential })
    }

    /// Runs the credential's declared test request and returns the HTTP
    /// status, for embedders that validate credentials themselves.
    pub async fn run_credential_test(&self) -> NodeResult<StatusCode> {
        let test = self.credential.test_request();
        debug!(url = %test.url, "running credential test");

        let resp = self
            .client
            .get(&test.url)
            .send()
            .await
            .map_err(|e| NodeError::Network(format!("Credential test failed: {e}")))?;

        Ok(resp.status())
    }

    /// Maps a non-2xx response to an error, preferring the structured error
    /// body when the API provides one.
    fn parse_api_error(status: StatusCode, body: &str) -> NodeError {
        if let Ok(err_resp) = serde_json::from_str::<ApiErrorResponse>(body) {
            if let Some(detail) = err_resp.error {
                return NodeError::ApiError {
                    status: status.as_u16(),
                    message: format!(
                        "{} (code: {})",
                        detail.message.unwrap_or_default(),
                        detail.code.unwrap_or_default(),
                    ),
                };
            }
            if let Some(detail) = err_resp.detail {
                return NodeError::ApiError {
                    status: status.as_u16(),
                    message: detail,
                };
            }
        }

        let truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        NodeError::ApiError {
            status: status.as_u16(),
            message: truncated,
        }
    }
}

#[async_trait]
impl AuthenticatedRequester for HttpTransport {
    async fn request_json(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> NodeResult<serde_json::Value> {
        let url = self.credential.endpoint(path);
        debug!(%method, %url, key = %self.credential.redact_key(), "sending request");

        let mut request = self
            .client
            .request(method, &url)
            .header("Accept", "application/json");
        for (name, value) in self.credential.authenticate() {
            request = request.header(name, value);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| NodeError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| NodeError::Network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            warn!(%url, %status, "request rejected");
            return Err(Self::parse_api_error(status, &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| NodeError::Network(format!("Failed to parse response body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> VideoEditorApiCredential {
        VideoEditorApiCredential::new("https://api.example.com", "test-key")
    }

    #[test]
    fn test_new_rejects_invalid_credential() {
        let result = HttpTransport::new(VideoEditorApiCredential::new("", "key"));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_api_error_structured() {
        let body = r#"{"error":{"message":"Rate limit exceeded","code":"rate_limit"}}"#;
        let err = HttpTransport::parse_api_error(StatusCode::TOO_MANY_REQUESTS, body);
        match err {
            NodeError::ApiError { status, message } => {
                assert_eq!(status, 429);
                assert!(message.contains("Rate limit exceeded"));
                assert!(message.contains("rate_limit"));
            }
            other => panic!("expected ApiError, got {other}"),
        }
    }

    #[test]
    fn test_parse_api_error_fastapi_detail() {
        let body = r#"{"detail":"ffmpeg exited with code 1"}"#;
        let err = HttpTransport::parse_api_error(StatusCode::INTERNAL_SERVER_ERROR, body);
        match err {
            NodeError::ApiError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "ffmpeg exited with code 1");
            }
            other => panic!("expected ApiError, got {other}"),
        }
    }

    #[test]
    fn test_parse_api_error_unstructured_is_truncated() {
        let body = "x".repeat(2000);
        let err = HttpTransport::parse_api_error(StatusCode::BAD_GATEWAY, &body);
        match err {
            NodeError::ApiError { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message.len(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("expected ApiError, got {other}"),
        }
    }

    #[test]
    fn test_debug_hides_credential() {
        let transport = HttpTransport::new(credential()).unwrap();
        let debug = format!("{transport:?}");
        assert!(debug.contains("https://api.example.com"));
        assert!(!debug.contains("test-key"));
    }
}
