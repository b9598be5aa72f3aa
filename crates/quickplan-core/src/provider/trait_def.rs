//! The `PlanProvider` trait -- the adapter interface for generative-AI
//! backends.
//!
//! The endpoint only knows this trait; the concrete backend (Gemini, or a
//! scripted fake in tests) is injected as `Arc<dyn PlanProvider>`.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// One structured-generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// Natural-language instruction.
    pub prompt: String,
    /// Schema the provider must constrain its JSON output to.
    pub schema: Value,
}

/// Errors raised by a provider adapter.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("provider returned no content")]
    EmptyResponse,

    /// The provider refused the prompt, e.g. on a safety filter.
    #[error("prompt blocked by provider: {0}")]
    Blocked(String),
}

/// Adapter interface for a structured-generation backend.
///
/// # Object Safety
///
/// This trait is object-safe so the endpoint can hold an
/// `Arc<dyn PlanProvider>` regardless of the backend.
#[async_trait]
pub trait PlanProvider: Send + Sync {
    /// Human-readable name for this provider (e.g. "gemini").
    fn name(&self) -> &str;

    /// Perform exactly one generation call and return the raw response
    /// text. Implementations must not retry.
    async fn generate(&self, api_key: &str, request: &ProviderRequest)
    -> Result<String, ProviderError>;
}

// Compile-time assertion: PlanProvider must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn PlanProvider) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Echoes the prompt back, proving the trait can be used as `dyn`.
    struct EchoProvider;

    #[async_trait]
    impl PlanProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(
            &self,
            _api_key: &str,
            request: &ProviderRequest,
        ) -> Result<String, ProviderError> {
            Ok(request.prompt.clone())
        }
    }

    #[tokio::test]
    async fn provider_is_object_safe() {
        let provider: Box<dyn PlanProvider> = Box::new(EchoProvider);
        assert_eq!(provider.name(), "echo");
        let request = ProviderRequest {
            prompt: "hello".to_owned(),
            schema: Value::Null,
        };
        assert_eq!(provider.generate("key", &request).await.unwrap(), "hello");
    }

    #[test]
    fn api_error_display_includes_status() {
        let err = ProviderError::Api {
            status: 403,
            message: "denied".to_owned(),
        };
        assert_eq!(err.to_string(), "API error 403: denied");
    }
}
