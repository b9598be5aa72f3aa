//! HTTP client for the plan generation endpoint.
//!
//! [`PlanClient::generate`] issues one `POST` and returns either a parsed
//! [`StrategicPlan`] or an opaque [`GenerationError`]. Status codes, server
//! messages and parse errors are logged here and never surfaced.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::error::GenerationError;
use crate::plan::{PlanRequest, StrategicPlan, parse_plan_json};

/// Path the endpoint is served under.
pub const ENDPOINT_PATH: &str = "/api/gemini";

/// Error body returned by the endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the generation endpoint.
#[derive(Debug, Clone)]
pub struct PlanClient {
    http: Client,
    endpoint_url: String,
}

impl PlanClient {
    /// Build a client for the full endpoint URL
    /// (e.g. `http://127.0.0.1:8787/api/gemini`).
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint_url: endpoint_url.into(),
        }
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Request a plan for the given mission and vision.
    ///
    /// Blank input fails before any request is made. There is no retry.
    pub async fn generate(
        &self,
        mission: &str,
        vision: &str,
    ) -> Result<StrategicPlan, GenerationError> {
        let request = PlanRequest::new(mission, vision);
        request.validate()?;

        debug!(url = %self.endpoint_url, "plan client: sending request");
        let response = self
            .http
            .post(&self.endpoint_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, url = %self.endpoint_url, "plan request failed");
                GenerationError::UpstreamFailure
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, "failed to read plan response body");
            GenerationError::UpstreamFailure
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| format!("Request failed with status {}", status.as_u16()));
            error!(status = status.as_u16(), %message, "plan endpoint returned an error");
            return Err(GenerationError::UpstreamFailure);
        }

        parse_plan_json(&body).map_err(|e| {
            error!(error = %e, "plan endpoint returned an invalid plan");
            GenerationError::MalformedResponse
        })
    }
}
