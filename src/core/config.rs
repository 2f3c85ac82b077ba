//! Process configuration read from the environment
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

use crate::features::personas::{PersonaId, DEFAULT_HISTORY_WINDOW};
use crate::llm::gemini::{DEFAULT_GEMINI_API_BASE, DEFAULT_GEMINI_MODELS};
use crate::llm::openai_chat::DEFAULT_OPENAI_MODEL;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Which hosted service backs the chatbot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    OpenAi,
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Gemini => write!(f, "gemini"),
            LlmProvider::OpenAi => write!(f, "openai"),
        }
    }
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(LlmProvider::Gemini),
            "openai" => Ok(LlmProvider::OpenAi),
            other => anyhow::bail!("Unknown LLM_PROVIDER '{other}'. Expected gemini or openai"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: LlmProvider,
    pub gemini_api_key: Option<String>,
    /// Candidate model names in preference order
    pub gemini_models: Vec<String>,
    pub gemini_api_base: String,
    pub openai_api_key: Option<String>,
    pub openai_models: Vec<String>,
    /// Exchanges kept in each transcript
    pub history_window: usize,
    pub default_persona: PersonaId,
    pub http_timeout_secs: u64,
    pub log_level: String,
}

impl Config {
    /// Read configuration from process environment. Call `dotenvy::dotenv()` first to
    /// pick up a `.env` file.
    ///
    /// A missing API key is not an error here; the chatbot reports itself unavailable.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let provider = match get("LLM_PROVIDER") {
            Some(value) => value.parse()?,
            None => LlmProvider::Gemini,
        };

        let gemini_models = match get("GEMINI_MODELS") {
            Some(value) => parse_list(&value),
            None => DEFAULT_GEMINI_MODELS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        };

        let openai_models = match get("OPENAI_MODEL") {
            Some(value) => parse_list(&value),
            None => vec![DEFAULT_OPENAI_MODEL.to_string()],
        };

        let history_window = match get("CHAT_HISTORY_WINDOW") {
            Some(value) => value.parse::<usize>().with_context(|| {
                format!("CHAT_HISTORY_WINDOW must be a number, got '{value}'")
            })?,
            None => DEFAULT_HISTORY_WINDOW,
        };
        if history_window == 0 {
            anyhow::bail!("CHAT_HISTORY_WINDOW must be at least 1");
        }

        let default_persona = match get("CHAT_DEFAULT_PERSONA") {
            Some(value) => value.parse()?,
            None => PersonaId::Naruto,
        };

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(value) => value.parse::<u64>().with_context(|| {
                format!("HTTP_TIMEOUT_SECS must be a number, got '{value}'")
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if http_timeout_secs == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECS must be at least 1");
        }

        Ok(Config {
            provider,
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_models,
            gemini_api_base: get("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_models,
            history_window,
            default_persona,
            http_timeout_secs,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Split a comma-separated list, dropping blanks
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
