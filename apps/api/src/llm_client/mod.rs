/// LLM client used by the responsibility judge.
///
/// Only `matching::judge` talks to the Anthropic API, and only through this
/// module. Everything else in the scoring pipeline is deterministic.
///
/// Model: claude-sonnet-4-5 (hardcoded so judgements stay comparable across runs)
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 2048;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// True when the model answered but the answer was unusable.
    pub fn is_malformed_output(&self) -> bool {
        matches!(self, LlmError::Parse(_) | LlmError::EmptyContent)
    }
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
    /// Text of the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
            .filter(|t| !t.trim().is_empty())
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

/// Anthropic Messages API wrapper with retry logic and a JSON helper.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, api_key })
    }

    /// Raw call returning the full response.
    /// Retries on 429 and 5xx with exponential backoff (1s, 2s).
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
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
                let delay = backoff_delay(attempt);
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "LLM call failed, retrying"
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
                warn!(status = status.as_u16(), "LLM API returned retryable status");
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
                input_tokens = llm_response.usage.input_tokens,
                output_tokens = llm_response.usage.output_tokens,
                "LLM call succeeded"
            );

            return Ok(llm_response);
        }

        Err(match last_error {
            Some(LlmError::Api { status: 429, .. }) | None => LlmError::RateLimited {
                retries: MAX_RETRIES,
            },
            Some(other) => other,
        })
    }

    /// Calls the model and deserializes its text answer as JSON.
    /// The prompt must ask for a JSON object.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        parse_json_answer(text)
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(1000 * (1 << (attempt - 1)))
}

/// Parses a model answer as JSON, tolerating code fences and leading or
/// trailing prose around a single object.
pub fn parse_json_answer<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let text = strip_json_fences(text);
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(err) => match (text.find('{'), text.rfind('}')) {
            (Some(start), Some(end)) if start < end => {
                serde_json::from_str(&text[start..=end]).map_err(LlmError::Parse)
            }
            _ => Err(LlmError::Parse(err)),
        },
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"covered\": []}\n```";
        assert_eq!(strip_json_fences(input), "{\"covered\": []}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"covered\": []}\n```";
        assert_eq!(strip_json_fences(input), "{\"covered\": []}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"covered\": []}  ";
        assert_eq!(strip_json_fences(input), "{\"covered\": []}");
    }

    #[test]
    fn test_parse_json_answer_skips_surrounding_prose() {
        let value: Value =
            parse_json_answer("Here is the result:\n{\"notCovered\": [1]}\nHope this helps.")
                .unwrap();
        assert_eq!(value["notCovered"][0], 1);
    }

    #[test]
    fn test_parse_json_answer_rejects_non_json() {
        let err = parse_json_answer::<Value>("I cannot help with that.").unwrap_err();
        assert!(err.is_malformed_output());
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
    }

    #[test]
    fn test_empty_text_block_is_treated_as_missing() {
        let response = LlmResponse {
            content: vec![ContentBlock {
                block_type: "text".into(),
                text: Some("   ".into()),
            }],
            usage: Usage {
                input_tokens: 1,
                output_tokens: 0,
            },
        };
        assert!(response.text().is_none());
    }

    #[test]
    fn test_transport_errors_are_not_malformed() {
        let err = LlmError::Api {
            status: 500,
            message: "overloaded".into(),
        };
        assert!(!err.is_malformed_output());
    }
}
