/// LLM Client — the single point of entry for all Claude API calls in the intake service.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Pipeline stages depend on the `TextGenerator` trait; this client is its
/// production implementation.
///
/// Model: claude-haiku-4-5 (hardcoded, do not make configurable)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

use prompts::{FIELD_EXTRACTION_SYSTEM, FIELD_PROMPT_TEMPLATE};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in the intake service.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-haiku-4-5";
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Bounds on one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationLimits {
    /// Characters of context passed to the model.
    pub max_context_chars: usize,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            max_context_chars: 2000,
            max_output_tokens: 100,
        }
    }
}

/// Generative extraction: an instruction plus a bounded context in, decoded text out.
/// Implementations must decode deterministically and be safe for concurrent use.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        instruction: &str,
        context: &str,
        limits: GenerationLimits,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The single LLM client used by the pipeline.
/// Wraps the Anthropic Messages API with retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, api_key })
    }

    /// Makes a raw call to the Claude API at temperature 0, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        max_tokens: u32,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens,
            temperature: 0.0,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(
        &self,
        instruction: &str,
        context: &str,
        limits: GenerationLimits,
    ) -> Result<String, LlmError> {
        let prompt = build_field_prompt(instruction, context, limits.max_context_chars);
        let response = self
            .call(&prompt, FIELD_EXTRACTION_SYSTEM, limits.max_output_tokens)
            .await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        Ok(text.trim().to_string())
    }
}

/// Fills the field prompt with at most `max_context_chars` characters of context.
fn build_field_prompt(instruction: &str, context: &str, max_context_chars: usize) -> String {
    let snippet: String = context.chars().take(max_context_chars).collect();
    FIELD_PROMPT_TEMPLATE
        .replace("{instruction}", instruction)
        .replace("{snippet}", &snippet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_prompt_truncates_context() {
        let prompt = build_field_prompt("Extract the candidate's full name", "abcdefghij", 4);
        assert!(prompt.starts_with("Extract the candidate's full name"));
        assert!(prompt.contains("abcd"));
        assert!(!prompt.contains("abcde"));
    }

    #[test]
    fn test_field_prompt_counts_chars_not_bytes() {
        let prompt = build_field_prompt("Extract", "ééééé", 3);
        assert!(prompt.contains("ééé"));
        assert!(!prompt.contains("éééé"));
    }

    #[test]
    fn test_response_text_picks_first_text_block() {
        let json = r#"{
            "content": [
                {"type": "tool_use", "text": null},
                {"type": "text", "text": "Jane Doe"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 3}
        }"#;
        let response: LlmResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("Jane Doe"));
    }

    #[test]
    fn test_default_limits() {
        let limits = GenerationLimits::default();
        assert_eq!(limits.max_context_chars, 2000);
        assert_eq!(limits.max_output_tokens, 100);
    }
}
