//! Blocking client for the remote site-analysis API.
//!
//! The server does all of the scoring. This side only posts the wizard's
//! answers and decodes the report.

use std::time::Duration;

use ongil_core::analysis::{AnalysisRequest, AnalysisResponse};
use thiserror::Error;
use tracing::{info, warn};

use crate::community::shorten;
use crate::config::ApiConfig;

/// Longest slice of an error body kept for display.
const MAX_ERROR_BODY: usize = 300;

/// Structured API failures, displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("unexpected response format: {0}")]
    Decode(String),
}

/// Anything that can turn a request into an analysis report.
///
/// The TUI worker holds one of these so tests can swap the network out.
pub trait AnalysisService: Send + Sync {
    fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, ApiError>;
}

pub struct ApiClient {
    client: reqwest::blocking::Client,
    url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("ongil/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: config.endpoint("/analysis"),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AnalysisService for ApiClient {
    fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, ApiError> {
        info!(url = %self.url, category = %request.category, "requesting analysis");

        let resp = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            warn!(code = status.as_u16(), "analysis request rejected");
            return Err(ApiError::Status {
                code: status.as_u16(),
                body: shorten(body.trim(), MAX_ERROR_BODY),
            });
        }

        let report: AnalysisResponse = resp.json().map_err(|e| ApiError::Decode(e.to_string()))?;
        info!(factors = report.scores.len(), "analysis received");
        Ok(report)
    }
}
