//! Chat completions HTTP client.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use yak_types::{ApiError, CompletionRequest, CompletionResponse};

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// Each call is attempted exactly once; the caller decides what a failure
/// means. The request timeout is set at client construction and expiry
/// surfaces as [`ApiError::Timeout`].
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ChatClient {
    /// Create a new client. `base_url` includes the API version segment,
    /// e.g. `https://api.openai.com/v1` or `http://localhost:11434/v1`.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send one completion request and return the parsed response.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ApiError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = format!("Bearer {}", self.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer).map_err(|_| ApiError::Auth {
                message: "Invalid API key format".into(),
            })?,
        );

        tracing::debug!(%url, model = %request.model, messages = request.messages.len(), "POST chat/completions");

        let result = self
            .http
            .post(&url)
            .headers(headers)
            .json(request)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Err(ApiError::Timeout),
            Err(e) => return Err(ApiError::Network(e.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status.as_u16(), &body, retry_after));
        }

        response
            .json::<CompletionResponse>()
            .await
            .map_err(|e| ApiError::Network(format!("malformed response body: {e}")))
    }
}

/// Parse the `retry-after` header value as seconds, in milliseconds.
fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<f64>().ok())
        .map(|secs| (secs * 1000.0) as u64)
}

/// Classify an HTTP error response into a typed ApiError.
fn classify_error(status: u16, body: &str, retry_after: Option<u64>) -> ApiError {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: Option<ErrorDetail>,
    }
    #[derive(serde::Deserialize)]
    struct ErrorDetail {
        message: Option<String>,
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.to_string());

    match status {
        401 => ApiError::Auth { message },
        400 => ApiError::BadRequest { message },
        429 => ApiError::RateLimited {
            retry_after_ms: retry_after,
        },
        _ => ApiError::Server { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_retry_after_integer() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("5"));
        assert_eq!(parse_retry_after(&headers), Some(5000));
    }

    #[test]
    fn parse_retry_after_missing_or_invalid() {
        assert_eq!(parse_retry_after(&HeaderMap::new()), None);
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("soon"));
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn classify_error_401() {
        let err = classify_error(401, r#"{"error":{"message":"invalid key"}}"#, None);
        assert!(matches!(err, ApiError::Auth { .. }));
    }

    #[test]
    fn classify_error_429_keeps_retry_after() {
        let err = classify_error(429, "{}", Some(3000));
        match err {
            ApiError::RateLimited { retry_after_ms } => assert_eq!(retry_after_ms, Some(3000)),
            other => panic!("Expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn classify_error_500_extracts_message() {
        let err = classify_error(500, r#"{"error":{"message":"boom"}}"#, None);
        match err {
            ApiError::Server { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("Expected Server, got {other:?}"),
        }
    }

    #[test]
    fn classify_error_unparseable_body_falls_back_to_raw() {
        let err = classify_error(503, "service unavailable", None);
        match err {
            ApiError::Server { message, .. } => assert_eq!(message, "service unavailable"),
            other => panic!("Expected Server, got {other:?}"),
        }
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = ChatClient::new(
            "key",
            "http://localhost:11434/v1/",
            Duration::from_secs(30),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:11434/v1");
    }
}
