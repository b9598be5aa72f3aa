//! Google Gemini adapter for the [`PlanProvider`] trait.
//!
//! Issues a single `generateContent` call with a JSON response MIME type
//! and a response schema, and returns the text of the first candidate.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::trait_def::{PlanProvider, ProviderError, ProviderRequest};

/// Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    http: Client,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
    pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL of the `generateContent` method for the configured model.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Build the request body for the Gemini API.
    fn build_request_body(request: &ProviderRequest) -> Value {
        json!({
            "contents": [
                { "role": "user", "parts": [{ "text": request.prompt }] }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": request.schema,
            }
        })
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL, Self::DEFAULT_MODEL)
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Concatenate the text parts of the first candidate. A response with no
/// text and a block reason is reported as [`ProviderError::Blocked`].
fn extract_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(match block_reason {
            Some(reason) => ProviderError::Blocked(reason),
            None => ProviderError::EmptyResponse,
        });
    }
    Ok(text)
}

/// Pull the human-readable message out of a Gemini error body, falling
/// back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_owned())
}

#[async_trait]
impl PlanProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        api_key: &str,
        request: &ProviderRequest,
    ) -> Result<String, ProviderError> {
        let url = self.endpoint_url();
        debug!(model = %self.model, %url, prompt_len = request.prompt.len(), "gemini: generate called");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&Self::build_request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(&body);
            warn!(status = status.as_u16(), %message, "gemini: API error");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = extract_text(parsed)?;
        debug!(response_len = text.len(), "gemini: response received");
        Ok(text)
    }
}
