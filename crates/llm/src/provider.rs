//! Language Model Trait
//!
//! Defines the black-box collaborator interface the gateway depends on:
//! single-shot entity extraction and grounded question answering. The
//! gateway never sees prompts, transports, or provider formats through
//! this seam.

use async_trait::async_trait;

use super::types::{LlmError, LlmResult, ProviderConfig};

/// Trait that all language-model providers must implement.
///
/// Both operations are single-shot text-in/text-out calls:
/// - `extract_entity` returns either a verbatim file hash or a best-guess
///   canonical product name, with no extra commentary.
/// - `answer_question` answers strictly from the supplied report context,
///   returning the [`crate::types::INSUFFICIENT_INFORMATION`] sentinel when
///   the context does not contain the answer.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Extract the product/vendor the free-text query refers to.
    ///
    /// A 32/40/64-character hex hash in the input must come back verbatim;
    /// anything else comes back as a bare canonical product name.
    async fn extract_entity(&self, text: &str) -> LlmResult<String>;

    /// Answer a question using only the supplied report context.
    ///
    /// Must not introduce facts outside the context; returns the
    /// insufficient-information sentinel instead of guessing.
    async fn answer_question(&self, context: &str, question: &str) -> LlmResult<String>;

    /// Check if the provider is healthy and reachable.
    ///
    /// For API providers this validates the API key.
    async fn health_check(&self) -> LlmResult<()>;

    /// Get the configuration for this provider.
    fn config(&self) -> &ProviderConfig;
}

/// Helper function to create an error for a missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Helper function to map HTTP error status codes to typed failures
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        404 => LlmError::ModelNotFound {
            model: body.to_string(),
        },
        429 => LlmError::RateLimited {
            message: body.to_string(),
            retry_after: None,
        },
        400 => LlmError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => LlmError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}
