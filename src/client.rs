//! HTTP client for the document analysis service.
//!
//! One exchange at a time: the caller (the session orchestrator) never
//! issues a second request before the first settles. The whole exchange
//! runs under a fixed time budget; when the budget is exhausted the
//! request is treated as failed, without actively aborting the transfer
//! beyond dropping the future.
//!
//! Transport errors are normalized into [`ExchangeFailure`] with canonical
//! wording so classification stays independent of reqwest's error shapes.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::candidate::UploadCandidate;
use crate::classify::ExchangeFailure;
use crate::models::{AnalysisResult, HealthStatus};

/// Fixed time budget for one analysis exchange.
pub const ANALYZE_TIMEOUT_MS: u64 = 60_000;

/// Error body the service returns on rejection.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// Client for the analysis service.
pub struct AnalysisClient {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl AnalysisClient {
    /// Create a client with the standard 60 s exchange budget.
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_millis(ANALYZE_TIMEOUT_MS))
    }

    /// Create a client with a custom exchange budget.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        }
    }

    /// The configured endpoint base address.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit one document for analysis.
    ///
    /// Sends a single multipart part named `file` carrying the raw bytes
    /// and declared media type. Success is the parsed result; any other
    /// outcome is a normalized [`ExchangeFailure`].
    pub async fn analyze(
        &self,
        candidate: &UploadCandidate,
    ) -> Result<AnalysisResult, ExchangeFailure> {
        let part = Part::bytes(candidate.bytes.clone())
            .file_name(candidate.file_name.clone())
            .mime_str(&candidate.media_type)
            .map_err(|e| ExchangeFailure::Transport {
                message: format!("invalid media type {}: {}", candidate.media_type, e),
            })?;
        let form = Form::new().part("file", part);

        let url = format!("{}/analyze-document", self.base_url);
        debug!(
            url = %url,
            file = %candidate.file_name,
            size = candidate.size(),
            "submitting document for analysis"
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.normalize(e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail);
            debug!(status = status.as_u16(), detail = ?detail, "analysis rejected");
            return Err(ExchangeFailure::Backend {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<AnalysisResult>()
            .await
            .map_err(|e| ExchangeFailure::Transport {
                message: format!("failed to parse analysis response: {}", e),
            })
    }

    /// Probe the service's health endpoint.
    pub async fn health(&self) -> Result<HealthStatus, ExchangeFailure> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.normalize(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeFailure::Backend {
                status: status.as_u16(),
                detail: None,
            });
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| ExchangeFailure::Transport {
                message: format!("failed to parse health response: {}", e),
            })
    }

    /// Map a reqwest error to a normalized transport outcome.
    ///
    /// Canonical wording matters here: classification keys off "timed
    /// out" and "Network Error", not off reqwest's types.
    fn normalize(&self, err: reqwest::Error) -> ExchangeFailure {
        let message = if err.is_timeout() {
            format!("request timed out after {} ms", self.timeout.as_millis())
        } else if err.is_connect() {
            format!("Network Error: {}", err)
        } else {
            err.to_string()
        };
        ExchangeFailure::Transport { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = AnalysisClient::new("http://localhost:8000/api/");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn test_error_body_tolerates_missing_detail() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.detail.is_none());

        let body: ErrorBody = serde_json::from_str(r#"{"detail": "bad upload"}"#).unwrap();
        assert_eq!(body.detail.as_deref(), Some("bad upload"));
    }
}
