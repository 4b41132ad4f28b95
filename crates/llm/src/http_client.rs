//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients with the
//! timeouts a provider configuration asks for.

use std::time::Duration;

use crate::types::ProviderConfig;

/// Build a `reqwest::Client` for the given provider configuration.
///
/// Applies the per-request timeout plus a short connect timeout so an
/// unreachable provider fails fast instead of hanging the gateway.
pub fn build_http_client(config: &ProviderConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build reqwest client")
}
