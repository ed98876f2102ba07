//! Error types for outline synthesis

use docugen_ast::ValidationError;
use thiserror::Error;

/// Result type for synthesis operations
pub type Result<T> = std::result::Result<T, SynthesisError>;

/// Failures of the external generator call
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No API key was configured
    #[error("No API key configured for provider '{provider}'")]
    MissingApiKey { provider: String },

    /// HTTP request error
    #[cfg(feature = "gemini")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// The provider answered with a payload it could not interpret
    #[error("Unexpected provider response: {0}")]
    UnexpectedResponse(String),
}

/// Errors of one synthesis request
///
/// Every variant is terminal for the request; nothing is retried.
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// Parameters rejected before any external call
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The external call failed
    #[error("Outline provider failed: {0}")]
    Provider(#[from] ProviderError),

    /// The response does not match the outline schema
    #[error("Response does not match the outline schema: {0}")]
    Schema(#[from] serde_json::Error),

    /// The response carried no text
    #[error("Outline provider returned an empty response")]
    EmptyResponse,
}

impl SynthesisError {
    /// Whether the request was stopped before reaching the provider
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Errors loading synthesis configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML syntax or type error
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is unusable
    #[error("Invalid synthesis setting '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_user_facing() {
        let err = SynthesisError::from(ValidationError::EmptyPrompt);
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please enter a topic or instructions.");
    }

    #[test]
    fn test_provider_error_display() {
        let err = SynthesisError::from(ProviderError::ServerError {
            status: 403,
            message: "API key not valid".to_string(),
        });
        assert!(!err.is_validation());
        assert_eq!(
            err.to_string(),
            "Outline provider failed: Server error (403): API key not valid"
        );
    }
}
