//! LLM Types
//!
//! Error taxonomy, provider configuration, and shared constants for the
//! language-model collaborator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The exact sentinel a grounded question-answering call returns when the
/// supplied report context does not contain the answer. Callers match on
/// this verbatim to distinguish "no answer" from a real answer.
pub const INSUFFICIENT_INFORMATION: &str = "Insufficient information in the cached report.";

/// Errors from language-model calls.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Missing or rejected API key
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Transport-level failure (DNS, connect, timeout)
    #[error("Network error: {message}")]
    NetworkError { message: String },

    /// Provider rate limiting (HTTP 429)
    #[error("Rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<u64>,
    },

    /// Malformed request rejected by the provider (HTTP 400)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Requested model does not exist (HTTP 404)
    #[error("Model not found: {model}")]
    ModelNotFound { model: String },

    /// Provider-side failure (HTTP 5xx)
    #[error("Server error: {message}")]
    ServerError {
        message: String,
        status: Option<u16>,
    },

    /// The response arrived but carried no usable content
    #[error("Empty response: {message}")]
    EmptyResponse { message: String },

    /// Anything else
    #[error("LLM error: {message}")]
    Other { message: String },
}

/// Result type alias for LLM calls
pub type LlmResult<T> = Result<T, LlmError>;

/// Configuration for a language-model provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key; absence fails fast before any request
    pub api_key: Option<String>,
    /// Base URL override for OpenAI-compatible gateways
    pub base_url: Option<String>,
    /// Model identifier
    pub model: String,
    /// Completion token cap
    pub max_tokens: u32,
    /// Sampling temperature; extraction and grounded QA want determinism
    pub temperature: f32,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
            timeout_seconds: 60,
        }
    }
}
