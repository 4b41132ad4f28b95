//! Trust Recon LLM
//!
//! The language-model collaborator for the gateway: single-shot entity
//! extraction from free-text queries and grounded question answering over
//! cached trust reports. Providers are black boxes behind the
//! [`LanguageModel`] trait; one OpenAI-compatible implementation is
//! included.

pub mod http_client;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use http_client::build_http_client;
pub use openai::OpenAiProvider;
pub use provider::{missing_api_key_error, parse_http_error, LanguageModel};
pub use types::{LlmError, LlmResult, ProviderConfig, INSUFFICIENT_INFORMATION};
