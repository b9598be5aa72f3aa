//! Error type shared by the generation endpoint and the request client.

use thiserror::Error;

/// Why a plan could not be generated.
///
/// Display strings are deliberately generic. Diagnostic detail (provider
/// status codes, parse errors, response bodies) is logged where the
/// failure happens and never carried in the error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Mission or vision missing or blank.
    #[error("{0}")]
    InvalidInput(String),

    /// The provider credential is not configured. Holds the name of the
    /// environment variable that should contain it.
    #[error("{0} environment variable is not set.")]
    MissingConfiguration(String),

    /// Transport failure, provider failure or non-success status.
    #[error("failed to generate strategic plan")]
    UpstreamFailure,

    /// A response arrived but is not a structurally valid plan.
    #[error("strategic plan response was malformed")]
    MalformedResponse,
}

impl GenerationError {
    /// Message used when mission or vision is missing.
    pub const MISSING_INPUT: &'static str = "Mission and vision are required.";

    pub fn missing_input() -> Self {
        Self::InvalidInput(Self::MISSING_INPUT.to_owned())
    }

    /// Whether the caller (rather than the server) is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// What the presentation tells the user. Server-side detail never
    /// reaches this message.
    pub fn user_message(&self) -> &'static str {
        if self.is_client_error() {
            "Please provide both a mission and a vision."
        } else {
            "An error occurred while generating the plan. Please try again."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_configuration_names_variable() {
        let err = GenerationError::MissingConfiguration("API_KEY".to_owned());
        assert_eq!(err.to_string(), "API_KEY environment variable is not set.");
    }

    #[test]
    fn only_invalid_input_is_client_error() {
        assert!(GenerationError::missing_input().is_client_error());
        assert!(!GenerationError::UpstreamFailure.is_client_error());
        assert!(!GenerationError::MalformedResponse.is_client_error());
        assert!(!GenerationError::MissingConfiguration("X".to_owned()).is_client_error());
    }

    #[test]
    fn user_message_hides_cause() {
        assert_eq!(
            GenerationError::missing_input().user_message(),
            "Please provide both a mission and a vision."
        );
        for err in [
            GenerationError::UpstreamFailure,
            GenerationError::MalformedResponse,
            GenerationError::MissingConfiguration("API_KEY".to_owned()),
        ] {
            assert_eq!(
                err.user_message(),
                "An error occurred while generating the plan. Please try again."
            );
        }
    }
}
