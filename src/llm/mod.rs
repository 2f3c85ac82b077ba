//! # LLM Layer
//!
//! Seams between the chat pipeline and hosted text generation services.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Added OpenAI chat completion backend
//! - 1.0.0: Initial release with Gemini generateContent backend

pub mod gemini;
pub mod openai_chat;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use gemini::{GeminiModel, GeminiProvider};
pub use openai_chat::{OpenAiModel, OpenAiProvider};

/// Decoding parameters sent with every generation call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Nucleus sampling threshold
    pub top_p: f32,
}

/// A model that turns a prompt into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model name this generator is bound to
    fn model_name(&self) -> &str;

    /// Issue a single generation call. No retries.
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;
}

/// A hosted service that can bind model names to generators
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Human-readable provider name for logs
    fn name(&self) -> &'static str;

    /// Names of models that support text generation
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Bind a generator to `model_name`, failing if the model cannot serve requests
    async fn bind(&self, model_name: &str) -> Result<Arc<dyn TextGenerator>>;
}
