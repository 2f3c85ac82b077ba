//! Gemini provider over the generateContent REST API

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::{GenerationConfig, ModelProvider, TextGenerator};

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Models in preference order, newest first
pub const DEFAULT_GEMINI_MODELS: &[&str] = &[
    "gemini-2.0-flash-exp",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
    "gemini-pro",
];

const GENERATE_CONTENT: &str = "generateContent";
/// Key travels as a header; request errors echo the URL
const API_KEY_HEADER: &str = "x-goog-api-key";

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: &'a GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiTextPart<'a>>,
}

#[derive(Serialize)]
struct GeminiTextPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<GeminiPromptFeedback>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiPromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

#[derive(Deserialize)]
struct GeminiModelList {
    #[serde(default)]
    models: Vec<GeminiModelInfo>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct GeminiModelInfo {
    name: String,
    #[serde(rename = "supportedGenerationMethods", default)]
    supported_generation_methods: Vec<String>,
}

// ============================================================================
// Provider
// ============================================================================

#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn model_url(&self, model_name: &str) -> String {
        format!("{}/models/{}", self.base_url, model_path(model_name))
    }
}

/// Accept both `gemini-pro` and `models/gemini-pro`
fn model_path(model_name: &str) -> &str {
    model_name.strip_prefix("models/").unwrap_or(model_name)
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(format!("{}/models", self.base_url))
                .header(API_KEY_HEADER, &self.api_key);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("Gemini API error: {} - {}", status, body);
            }

            let page: GeminiModelList = response.json().await?;
            names.extend(
                page.models
                    .into_iter()
                    .filter(|m| {
                        m.supported_generation_methods
                            .iter()
                            .any(|g| g == GENERATE_CONTENT)
                    })
                    .map(|m| m.name),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(names)
    }

    async fn bind(&self, model_name: &str) -> Result<Arc<dyn TextGenerator>> {
        let response = self
            .client
            .get(self.model_url(model_name))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            anyhow::bail!("404 model {model_name} not found");
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error: {} - {}", status, body);
        }

        let info: GeminiModelInfo = response.json().await?;
        if !info.supported_generation_methods.is_empty()
            && !info.supported_generation_methods.iter().any(|g| g == GENERATE_CONTENT)
        {
            anyhow::bail!("{} does not support {GENERATE_CONTENT}", info.name);
        }

        Ok(Arc::new(GeminiModel {
            provider: self.clone(),
            model_name: model_path(model_name).to_string(),
        }))
    }
}

// ============================================================================
// Bound model
// ============================================================================

pub struct GeminiModel {
    provider: GeminiProvider,
    model_name: String,
}

#[async_trait]
impl TextGenerator for GeminiModel {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let api_request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiTextPart { text: prompt }],
            }],
            generation_config: config,
        };

        let url = format!(
            "{}:{GENERATE_CONTENT}",
            self.provider.model_url(&self.model_name)
        );

        debug!(
            "Gemini generateContent: model={}, prompt_chars={}",
            self.model_name,
            prompt.chars().count()
        );

        let response = self
            .provider
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.provider.api_key)
            .json(&api_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error: {} - {}", status, body);
        }

        let api_response: GeminiResponse = response.json().await?;
        extract_text(api_response)
    }
}

/// Join the text parts of the first candidate
fn extract_text(api_response: GeminiResponse) -> Result<String> {
    if let Some(error) = api_response.error {
        anyhow::bail!("Gemini error: {}", error.message);
    }

    let candidate = api_response
        .candidates
        .and_then(|c| c.into_iter().next());

    let Some(candidate) = candidate else {
        let reason = api_response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "unknown".to_string());
        anyhow::bail!("Gemini returned no candidates (block reason: {reason})");
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        anyhow::bail!("Gemini returned an empty response (finish reason: {reason})");
    }

    Ok(text)
}
