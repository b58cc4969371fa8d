//! OpenAI-compatible chat completions client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::Agent;

use super::ChatBackend;
use crate::config::LlmConfig;
use crate::error::{BotError, BotResult};

/// API base used when none is configured.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Chat model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Sampling temperature used when none is configured.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Environment variable read for the API key when none is configured.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat backend for `POST {api_base}/chat/completions`.
pub struct OpenAiChat {
    agent: Agent,
    api_base: String,
    model: String,
    temperature: f64,
    api_key: String,
}

impl OpenAiChat {
    /// Create a client with explicit settings.
    pub fn new(api_base: &str, model: &str, temperature: f64, api_key: impl Into<String>) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self {
            agent,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature,
            api_key: api_key.into(),
        }
    }

    /// Create a client from config, reading the key from the environment.
    pub fn from_config(config: &LlmConfig) -> BotResult<Self> {
        let var = config
            .api_key_env
            .as_deref()
            .unwrap_or(DEFAULT_API_KEY_ENV);
        let api_key = std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| BotError::MissingApiKey {
                var: var.to_string(),
            })?;
        Ok(Self::new(
            config.api_base.as_deref().unwrap_or(DEFAULT_API_BASE),
            config.model.as_deref().unwrap_or(DEFAULT_MODEL),
            config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            api_key,
        ))
    }

    /// Model name requests are sent to.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ChatBackend for OpenAiChat {
    #[tracing::instrument(skip_all, fields(model = %self.model))]
    fn chat(&self, prompt: &str) -> BotResult<String> {
        let url = format!("{}/chat/completions", self.api_base);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let mut resp = self
            .agent
            .post(&url)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&request)
            .map_err(|e| BotError::Request(e.to_string()))?;

        let body: ChatResponse = resp
            .body_mut()
            .read_json()
            .map_err(|e| BotError::Request(format!("unreadable response: {e}")))?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default())
    }
}

impl std::fmt::Debug for OpenAiChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChat")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_reported_by_variable_name() {
        let config = LlmConfig {
            api_key_env: Some("STEMWISE_TEST_KEY_THAT_IS_NEVER_SET".to_string()),
            ..LlmConfig::default()
        };
        let err = OpenAiChat::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("STEMWISE_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let chat = OpenAiChat::new("https://example.org/v1/", "gpt-4", 0.7, "sk-secret");
        let debug = format!("{chat:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("https://example.org/v1\""));
        assert_eq!(chat.model(), "gpt-4");
    }

    #[test]
    fn request_body_has_openai_shape() {
        let request = ChatRequest {
            model: "gpt-4",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.7,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["temperature"], 0.7);
    }

    #[test]
    fn response_content_is_optional() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert!(body.choices[0].message.as_ref().unwrap().content.is_none());
    }
}
