//! Plan generation service: the endpoint's behaviour, independent of HTTP.
//!
//! [`generate_plan`] checks the credential, validates input, calls the
//! provider exactly once and parses its output. Every failure is mapped to
//! a [`GenerationError`]; no partial plan is ever returned.

use std::env;

use tracing::{error, info};

use crate::error::GenerationError;
use crate::provider::{PlanProvider, ProviderRequest};

use super::generate::{PlanRequest, build_prompt, response_schema};
use super::parser::parse_plan_json;
use super::schema::StrategicPlan;

/// Where the provider credential comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Read the named environment variable on every request.
    Env(String),
    /// A value fixed at construction time.
    Fixed(Option<String>),
}

impl ApiKeySource {
    /// Environment variable read when nothing else is configured.
    pub const DEFAULT_VAR: &str = "API_KEY";

    /// Current credential, if any. Empty values count as unset.
    pub fn resolve(&self) -> Option<String> {
        let value = match self {
            ApiKeySource::Env(var) => env::var(var).ok(),
            ApiKeySource::Fixed(value) => value.clone(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Name reported when the credential is missing.
    pub fn variable(&self) -> &str {
        match self {
            ApiKeySource::Env(var) => var,
            ApiKeySource::Fixed(_) => Self::DEFAULT_VAR,
        }
    }
}

impl Default for ApiKeySource {
    fn default() -> Self {
        ApiKeySource::Env(Self::DEFAULT_VAR.to_owned())
    }
}

/// Generate a plan for `request` using `provider`.
///
/// The credential is resolved first; without it the request fails with
/// [`GenerationError::MissingConfiguration`] and the provider is not
/// called. Invalid input likewise never reaches the provider.
pub async fn generate_plan(
    provider: &dyn PlanProvider,
    api_key: &ApiKeySource,
    request: &PlanRequest,
) -> Result<StrategicPlan, GenerationError> {
    let Some(key) = api_key.resolve() else {
        error!(variable = api_key.variable(), "provider credential is not configured");
        return Err(GenerationError::MissingConfiguration(
            api_key.variable().to_owned(),
        ));
    };

    request.validate()?;

    let provider_request = ProviderRequest {
        prompt: build_prompt(request),
        schema: response_schema(),
    };

    info!(provider = provider.name(), "requesting strategic plan");
    let text = provider
        .generate(&key, &provider_request)
        .await
        .map_err(|e| {
            error!(provider = provider.name(), error = %e, "provider call failed");
            GenerationError::UpstreamFailure
        })?;

    let plan = parse_plan_json(&text).map_err(|e| {
        error!(provider = provider.name(), error = %e, "provider returned an invalid plan");
        GenerationError::MalformedResponse
    })?;

    info!(
        strategy = %plan.how_to_win.strategy,
        goals = plan.goals.len(),
        tasks = plan.tasks.len(),
        "strategic plan generated"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_source_resolves_value() {
        let source = ApiKeySource::Fixed(Some("secret".to_owned()));
        assert_eq!(source.resolve().as_deref(), Some("secret"));
        assert_eq!(source.variable(), "API_KEY");
    }

    #[test]
    fn blank_value_counts_as_unset() {
        assert_eq!(ApiKeySource::Fixed(Some("  ".to_owned())).resolve(), None);
        assert_eq!(ApiKeySource::Fixed(None).resolve(), None);
    }

    #[test]
    fn env_source_reports_its_variable() {
        let source = ApiKeySource::Env("QUICKPLAN_TEST_UNSET_KEY_VAR".to_owned());
        assert_eq!(source.variable(), "QUICKPLAN_TEST_UNSET_KEY_VAR");
        assert_eq!(source.resolve(), None);
    }

    #[test]
    fn default_reads_api_key_var() {
        assert_eq!(ApiKeySource::default(), ApiKeySource::Env("API_KEY".to_owned()));
    }
}
