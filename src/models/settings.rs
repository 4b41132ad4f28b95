//! Settings Models
//!
//! Application configuration and settings data structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use trust_recon_llm::ProviderConfig;

/// Language-model settings stored alongside the rest of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// API key for the provider
    pub api_key: Option<String>,
    /// Base URL override for OpenAI-compatible gateways
    pub base_url: Option<String>,
    /// Model identifier
    pub model: String,
    /// Completion token cap
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        let provider = ProviderConfig::default();
        Self {
            api_key: provider.api_key,
            base_url: provider.base_url,
            model: provider.model,
            max_tokens: provider.max_tokens,
            temperature: provider.temperature,
            timeout_seconds: provider.timeout_seconds,
        }
    }
}

impl From<&LlmSettings> for ProviderConfig {
    fn from(settings: &LlmSettings) -> Self {
        ProviderConfig {
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            timeout_seconds: settings.timeout_seconds,
        }
    }
}

/// Application configuration stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Research backend stream endpoint. Required before any research run;
    /// absence is a hard configuration error reported pre-connection.
    pub research_endpoint: Option<String>,
    /// Language-model provider settings
    #[serde(default)]
    pub llm: LlmSettings,
    /// Database location override; defaults to ~/.trust-recon/data.db
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl AppConfig {
    /// Validate the configuration, returning a human-readable reason when
    /// a field is unusable.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(endpoint) = &self.research_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(format!(
                    "research_endpoint must be an absolute http(s) URL, got: {}",
                    endpoint
                ));
            }
        }
        if self.llm.model.trim().is_empty() {
            return Err("llm.model must not be empty".to_string());
        }
        if self.llm.max_tokens == 0 {
            return Err("llm.max_tokens must be greater than zero".to_string());
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(format!(
                "llm.temperature must be within 0.0..=2.0, got: {}",
                self.llm.temperature
            ));
        }
        Ok(())
    }

    /// Provider configuration derived from the LLM settings.
    pub fn provider_config(&self) -> ProviderConfig {
        (&self.llm).into()
    }
}
