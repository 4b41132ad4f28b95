//! OpenAI-Compatible Provider
//!
//! Implementation of the LanguageModel trait against an OpenAI-compatible
//! chat-completions endpoint. Both operations are single, non-streaming
//! requests with temperature pinned by configuration.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::http_client::build_http_client;
use crate::provider::{missing_api_key_error, parse_http_error, LanguageModel};
use crate::types::{LlmError, LlmResult, ProviderConfig, INSUFFICIENT_INFORMATION};

/// Default OpenAI API base URL
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// System prompt for entity extraction. The contract requires a bare name
/// or a verbatim hash with no commentary, so the gateway can normalize the
/// response directly into a cache key.
const ENTITY_EXTRACTION_PROMPT: &str = "\
You identify the software product or vendor a user's query refers to.\n\
If the query is a 32, 40, or 64 character hexadecimal file hash, respond with that hash exactly as given.\n\
Otherwise respond with the canonical product name only.\n\
Respond with the name or hash alone: no punctuation, no explanation, no extra words.";

/// System prompt for grounded question answering over a cached report.
const QUESTION_ANSWERING_PROMPT: &str = "\
You answer questions about a software trust report.\n\
Use only facts stated in the report context provided by the user. Do not use outside knowledge.\n\
If the context does not contain the answer, respond with exactly: Insufficient information in the cached report.";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Provider for OpenAI-compatible chat-completions APIs.
pub struct OpenAiProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: ProviderConfig) -> Self {
        let client = build_http_client(&config);
        Self { config, client }
    }

    /// Get the API base URL
    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(OPENAI_API_BASE)
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url().trim_end_matches('/'))
    }

    /// Run one system+user exchange and return the assistant text.
    async fn chat(&self, system: &str, user: &str) -> LlmResult<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| missing_api_key_error("openai"))?;

        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        });

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;
            return Err(parse_http_error(status, &body_text, "openai"));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LlmError::EmptyResponse {
                message: "completion carried no content".to_string(),
            })?;

        Ok(content)
    }
}

#[async_trait]
impl LanguageModel for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn extract_entity(&self, text: &str) -> LlmResult<String> {
        let answer = self.chat(ENTITY_EXTRACTION_PROMPT, text).await?;
        // Models occasionally quote the name despite the prompt.
        let cleaned = answer.trim().trim_matches('"').trim().to_string();
        debug!(query = %text, entity = %cleaned, "extracted entity");
        if cleaned.is_empty() {
            return Err(LlmError::EmptyResponse {
                message: "entity extraction returned an empty name".to_string(),
            });
        }
        Ok(cleaned)
    }

    async fn answer_question(&self, context: &str, question: &str) -> LlmResult<String> {
        let user = format!(
            "Report context:\n{}\n\nQuestion: {}",
            context, question
        );
        let answer = self.chat(QUESTION_ANSWERING_PROMPT, &user).await?;
        debug!(
            question = %question,
            grounded = answer != INSUFFICIENT_INFORMATION,
            "answered question from cached report"
        );
        Ok(answer)
    }

    async fn health_check(&self) -> LlmResult<()> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| missing_api_key_error("openai"))?;

        let url = format!("{}/models", self.base_url().trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let body_text = response.text().await.unwrap_or_default();
            return Err(parse_http_error(status, &body_text, "openai"));
        }

        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}
