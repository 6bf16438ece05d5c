//! Backend client — the single point of entry for all cover-letter service
//! calls in the workbench.
//!
//! ARCHITECTURAL RULE: no other module may issue HTTP requests directly.
//! Base-url handling, timeouts, and error mapping all live here, so every
//! flow surfaces failures the same way.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod types;

use crate::api::types::{
    GenerationRequest, GenerationResult, JobAnalysis, JobAnalysisRequest, PromptSet,
};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response. `message` is whatever usable text the error body
    /// carried, already extracted.
    #[error("backend rejected the request (status {status})")]
    Request { status: u16, message: Option<String> },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// Message for the inline error panel in the generation flows.
    pub fn panel_message(&self) -> String {
        self.message_or("Unknown error")
    }

    /// Message for the blocking alert in the analysis flow.
    pub fn alert_message(&self) -> String {
        self.message_or("Analysis failed")
    }

    fn message_or(&self, fallback: &str) -> String {
        match self {
            ApiError::Request {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Request { message: None, .. } => fallback.to_string(),
            ApiError::Network(e) => e.to_string(),
            ApiError::Parse(e) => e.to_string(),
        }
    }
}

/// Pulls a human-readable message out of an error body. The backend is
/// inconsistent about the key: its own errors use `error`, framework
/// validation errors use `detail`. `error` wins when both are present;
/// empty or non-string values count as absent.
fn error_body_message(body: &Value) -> Option<String> {
    ["error", "detail"].into_iter().find_map(|key| {
        body.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Reads a backend response the way the UI consumes it: the body is parsed
/// as JSON first, then the status decides between payload and error. An
/// unparseable body is a `Parse` error even on an error status.
async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    let value: Value = serde_json::from_str(&body)?;

    if status.is_success() {
        Ok(serde_json::from_value(value)?)
    } else {
        warn!("backend returned {}: {}", status, body);
        Err(ApiError::Request {
            status: status.as_u16(),
            message: error_body_message(&value),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The three backend operations the workbench drives. Implement this to swap
/// the transport without touching the controller.
///
/// Carried by the controller as `Arc<dyn GenerationBackend>`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, ApiError>;

    async fn fetch_prompts(&self) -> Result<PromptSet, ApiError>;

    async fn analyze_job(&self, request: &JobAnalysisRequest) -> Result<JobAnalysis, ApiError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

/// The real client. One reqwest `Client` with a fixed request timeout; a
/// request that exceeds it surfaces as `ApiError::Network`, the same class
/// as any other transport failure.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl GenerationBackend for BackendClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, ApiError> {
        debug!(
            "POST /generate: model={}, use_fallback={}",
            request.model_name, request.use_fallback
        );

        let response = self
            .client
            .post(self.url("/generate"))
            .json(request)
            .send()
            .await?;

        let result: GenerationResult = parse_response(response).await?;

        debug!(
            "generation succeeded: quality_score={:.3}, keywords_found={}",
            result.quality_score, result.keywords_found
        );

        Ok(result)
    }

    async fn fetch_prompts(&self) -> Result<PromptSet, ApiError> {
        let response = self.client.get(self.url("/prompts")).send().await?;
        parse_response(response).await
    }

    async fn analyze_job(&self, request: &JobAnalysisRequest) -> Result<JobAnalysis, ApiError> {
        debug!("POST /analyze-job: {} chars", request.job_description.len());

        let response = self
            .client
            .post(self.url("/analyze-job"))
            .json(request)
            .send()
            .await?;

        parse_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_message_prefers_error_over_detail() {
        let body = json!({"error": "model unavailable", "detail": "something else"});
        assert_eq!(
            error_body_message(&body),
            Some("model unavailable".to_string())
        );
    }

    #[test]
    fn test_error_body_message_falls_through_empty_error() {
        let body = json!({"error": "", "detail": "validation failed"});
        assert_eq!(
            error_body_message(&body),
            Some("validation failed".to_string())
        );
    }

    #[test]
    fn test_error_body_message_reads_detail_alone() {
        let body = json!({"detail": "model unavailable"});
        assert_eq!(
            error_body_message(&body),
            Some("model unavailable".to_string())
        );
    }

    #[test]
    fn test_error_body_message_ignores_non_string_values() {
        let body = json!({"error": {"code": 500}, "detail": 42});
        assert_eq!(error_body_message(&body), None);
    }

    #[test]
    fn test_error_body_message_absent_keys() {
        let body = json!({"status": "failed"});
        assert_eq!(error_body_message(&body), None);
    }

    #[test]
    fn test_panel_message_uses_extracted_text() {
        let error = ApiError::Request {
            status: 500,
            message: Some("model unavailable".to_string()),
        };
        assert_eq!(error.panel_message(), "model unavailable");
    }

    #[test]
    fn test_panel_message_generic_fallback() {
        let error = ApiError::Request {
            status: 502,
            message: None,
        };
        assert_eq!(error.panel_message(), "Unknown error");
    }

    #[test]
    fn test_alert_message_analysis_fallback() {
        let error = ApiError::Request {
            status: 500,
            message: None,
        };
        assert_eq!(error.alert_message(), "Analysis failed");
    }

    #[test]
    fn test_alert_message_prefers_body_text() {
        let error = ApiError::Request {
            status: 422,
            message: Some("job_description is required".to_string()),
        };
        assert_eq!(error.alert_message(), "job_description is required");
    }

    #[test]
    fn test_parse_error_message_passes_through() {
        let parse_error = serde_json::from_str::<Value>("not json").unwrap_err();
        let error = ApiError::Parse(parse_error);
        let message = error.panel_message();
        assert!(message.contains("expected"), "got: {message}");
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = BackendClient::new("http://127.0.0.1:8001/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url("/generate"), "http://127.0.0.1:8001/generate");
    }

    #[test]
    fn test_base_url_without_trailing_slash() {
        let client = BackendClient::new("http://127.0.0.1:8001", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url("/prompts"), "http://127.0.0.1:8001/prompts");
    }
}
