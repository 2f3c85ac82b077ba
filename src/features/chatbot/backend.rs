//! Backend initialization
//!
//! Resolves the configured provider into either a bound generator or a permanent
//! unavailable state. Runs once at startup; nothing is retried per request.

use log::{error, info, warn};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{Config, LlmProvider};
use crate::llm::{GeminiProvider, ModelProvider, OpenAiProvider, TextGenerator};

/// Characters of a binding error shown in the startup log
const BIND_ERROR_PREVIEW_CHARS: usize = 80;

/// Why the backend could not be brought up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// Credential variable missing or blank
    MissingCredential { var: &'static str },
    /// Every candidate model failed to bind
    NoServableModel { tried: Vec<String> },
    /// The HTTP client could not be constructed
    ClientSetup(String),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::MissingCredential { var } => write!(f, "{var} is not set"),
            UnavailableReason::NoServableModel { tried } if tried.is_empty() => {
                write!(f, "no candidate models configured")
            }
            UnavailableReason::NoServableModel { tried } => {
                write!(
                    f,
                    "none of the models could be loaded ({})",
                    tried.join(", ")
                )
            }
            UnavailableReason::ClientSetup(e) => write!(f, "client setup failed: {e}"),
        }
    }
}

/// Process-wide handle to the generation service
pub enum ChatBackend {
    Ready {
        generator: Arc<dyn TextGenerator>,
        model_name: String,
    },
    Unavailable(UnavailableReason),
}

impl fmt::Debug for ChatBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatBackend::Ready { model_name, .. } => f
                .debug_struct("Ready")
                .field("model_name", model_name)
                .finish(),
            ChatBackend::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

impl ChatBackend {
    /// Wrap an already bound generator
    pub fn ready(generator: Arc<dyn TextGenerator>) -> Self {
        let model_name = generator.model_name().to_string();
        ChatBackend::Ready {
            generator,
            model_name,
        }
    }

    /// Bring up the provider selected in `config`
    pub async fn from_config(config: &Config) -> Self {
        let timeout = Duration::from_secs(config.http_timeout_secs);

        match config.provider {
            LlmProvider::Gemini => {
                let Some(api_key) = config.gemini_api_key.as_deref() else {
                    return Self::missing_credential("GEMINI_API_KEY");
                };
                match GeminiProvider::new(api_key, &config.gemini_api_base, timeout) {
                    Ok(provider) => Self::connect(&provider, &config.gemini_models).await,
                    Err(e) => Self::setup_failed(e),
                }
            }
            LlmProvider::OpenAi => {
                let Some(api_key) = config.openai_api_key.as_deref() else {
                    return Self::missing_credential("OPENAI_API_KEY");
                };
                match OpenAiProvider::new(api_key, timeout) {
                    Ok(provider) => Self::connect(&provider, &config.openai_models).await,
                    Err(e) => Self::setup_failed(e),
                }
            }
        }
    }

    /// Try each candidate in order and keep the first that binds
    pub async fn connect(provider: &dyn ModelProvider, candidates: &[String]) -> Self {
        match provider.list_models().await {
            Ok(models) => {
                info!("📋 {} models with generation support:", provider.name());
                for model in &models {
                    info!("   ✓ {model}");
                }
            }
            Err(e) => warn!("⚠️ Could not list {} models: {e}", provider.name()),
        }

        info!("🔍 Trying to load {} model...", provider.name());
        for model_name in candidates {
            match provider.bind(model_name).await {
                Ok(generator) => {
                    info!("   {model_name}: ✅ SUCCESS");
                    info!("🎉 Chatbot ready with model: {model_name}");
                    return ChatBackend::Ready {
                        generator,
                        model_name: model_name.clone(),
                    };
                }
                Err(e) => warn!("   {model_name}: ❌ Failed ({})", bind_error_summary(&e)),
            }
        }

        error!(
            "❌ Could not load any {} model. Check the API key and the candidate model list",
            provider.name()
        );
        ChatBackend::Unavailable(UnavailableReason::NoServableModel {
            tried: candidates.to_vec(),
        })
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ChatBackend::Ready { .. })
    }

    pub fn model_name(&self) -> Option<&str> {
        match self {
            ChatBackend::Ready { model_name, .. } => Some(model_name),
            ChatBackend::Unavailable(_) => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&UnavailableReason> {
        match self {
            ChatBackend::Ready { .. } => None,
            ChatBackend::Unavailable(reason) => Some(reason),
        }
    }

    fn missing_credential(var: &'static str) -> Self {
        error!("❌ {var} not found in environment or .env file");
        ChatBackend::Unavailable(UnavailableReason::MissingCredential { var })
    }

    fn setup_failed(e: anyhow::Error) -> Self {
        error!("❌ Error configuring LLM client: {e}");
        ChatBackend::Unavailable(UnavailableReason::ClientSetup(e.to_string()))
    }
}

/// Short form of a binding error for the startup log
fn bind_error_summary(e: &anyhow::Error) -> String {
    let message = e.to_string();
    if message.contains("404") {
        "Model not found".to_string()
    } else {
        message.chars().take(BIND_ERROR_PREVIEW_CHARS).collect()
    }
}
