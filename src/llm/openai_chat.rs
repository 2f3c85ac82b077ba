//! OpenAI provider
//!
//! Generation goes through the `openai` crate's chat completion builder, which reads its
//! credentials from `OPENAI_KEY` in the environment. Model discovery and binding use the
//! REST models endpoint directly.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use openai::chat::{
    ChatCompletion, ChatCompletionBuilder, ChatCompletionMessage, ChatCompletionMessageRole,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::{GenerationConfig, ModelProvider, TextGenerator};

pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Model id prefixes that serve chat completions
const CHAT_MODEL_PREFIXES: &[&str] = &["gpt-", "o1", "o3", "o4", "chatgpt-"];

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ModelInfo {
    id: String,
}

#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: DEFAULT_OPENAI_API_BASE.to_string(),
        })
    }
}

fn is_chat_model(id: &str) -> bool {
    CHAT_MODEL_PREFIXES.iter().any(|p| id.starts_with(p))
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error: {} - {}", status, body);
        }

        let list: ModelList = response.json().await?;
        let mut names: Vec<String> = list
            .data
            .into_iter()
            .map(|m| m.id)
            .filter(|id| is_chat_model(id))
            .collect();
        names.sort();
        Ok(names)
    }

    async fn bind(&self, model_name: &str) -> Result<Arc<dyn TextGenerator>> {
        let response = self
            .client
            .get(format!("{}/models/{model_name}", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            anyhow::bail!("404 model {model_name} not found");
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error: {} - {}", status, body);
        }

        Ok(Arc::new(OpenAiModel {
            model_name: model_name.to_string(),
        }))
    }
}

pub struct OpenAiModel {
    model_name: String,
}

#[async_trait]
impl TextGenerator for OpenAiModel {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        debug!(
            "OpenAI chat completion: model={}, prompt_chars={}",
            self.model_name,
            prompt.chars().count()
        );

        let completion = completion_request(&self.model_name, prompt, config)
            .create()
            .await
            .map_err(|e| anyhow::anyhow!("OpenAI API error: {}", e))?;

        completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("No response from OpenAI"))
    }
}

/// Chat completion carrying the persona's decoding parameters
///
/// The transcript already holds the persona prompt, so it goes out as one user turn.
fn completion_request(
    model_name: &str,
    prompt: &str,
    config: &GenerationConfig,
) -> ChatCompletionBuilder {
    ChatCompletion::builder(
        model_name,
        vec![ChatCompletionMessage {
            role: ChatCompletionMessageRole::User,
            content: Some(prompt.to_string()),
            name: None,
            function_call: None,
            tool_call_id: None,
            tool_calls: None,
        }],
    )
    .temperature(config.temperature)
    .top_p(config.top_p)
    .max_tokens(u64::from(config.max_output_tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::personas::{PersonaId, PersonaManager};

    fn close(value: &serde_json::Value, expected: f64) -> bool {
        value.as_f64().is_some_and(|v| (v - expected).abs() < 1e-6)
    }

    #[test]
    fn test_completion_request_carries_persona_config() {
        let manager = PersonaManager::new();
        let sasuke = manager.get_persona(PersonaId::Sasuke).unwrap();

        let request = completion_request("gpt-4o", "Human: hi\nSasuke:", &sasuke.generation)
            .build()
            .unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["max_tokens"], 300);
        assert!(close(&value["temperature"], 0.6), "{}", value["temperature"]);
        assert!(close(&value["top_p"], 0.8), "{}", value["top_p"]);
    }

    #[test]
    fn test_completion_request_single_user_turn() {
        let config = GenerationConfig {
            temperature: 0.95,
            max_output_tokens: 500,
            top_p: 0.9,
        };
        let request = completion_request("gpt-4o", "Human: hi\nNaruto:", &config)
            .build()
            .unwrap();
        let value = serde_json::to_value(&request).unwrap();

        let messages = value["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Human: hi\nNaruto:");
        assert_eq!(value["max_tokens"], 500);
    }

    #[test]
    fn test_is_chat_model() {
        assert!(is_chat_model("gpt-4o"));
        assert!(is_chat_model("gpt-4o-mini"));
        assert!(is_chat_model("o1-preview"));
        assert!(!is_chat_model("text-embedding-3-small"));
        assert!(!is_chat_model("whisper-1"));
        assert!(!is_chat_model("dall-e-3"));
    }

    #[test]
    fn test_model_list_parsing() {
        let list: ModelList = serde_json::from_str(
            r#"{"object":"list","data":[{"id":"gpt-4o","object":"model"},{"id":"tts-1","object":"model"}]}"#,
        )
        .unwrap();
        let ids: Vec<_> = list.data.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["gpt-4o", "tts-1"]);
    }

    #[test]
    fn test_bound_model_name() {
        let model = OpenAiModel {
            model_name: "gpt-4o".to_string(),
        };
        assert_eq!(model.model_name(), "gpt-4o");
    }
}
