//! # Feature: Character Chatbot
//!
//! Persona chat pipeline: history window, transcript, one generation call, touch-up.
//! Never fails towards the caller; problems come back as display strings.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Backend resolved once into Ready/Unavailable instead of an availability flag
//! - 1.0.0: Initial release

pub mod backend;

pub use backend::{ChatBackend, UnavailableReason};

use log::{debug, error};

use crate::core::Config;
use crate::features::personas::{touch_up, PersonaId, PersonaManager, PromptBuilder};

/// Returned for every call when the backend never came up
pub const UNAVAILABLE_MESSAGE: &str = "❌ Chatbot not available. Please check your API key.";
/// Prefix of replies that carry a generation error
pub const ERROR_MARKER: &str = "❌ Error: ";

pub struct CharacterChatbot {
    backend: ChatBackend,
    personas: PersonaManager,
    history_window: usize,
}

impl CharacterChatbot {
    pub fn new(backend: ChatBackend, history_window: usize) -> Self {
        Self {
            backend,
            personas: PersonaManager::new(),
            history_window,
        }
    }

    /// Initialize the backend from `config`
    pub async fn from_config(config: &Config) -> Self {
        let backend = ChatBackend::from_config(config).await;
        Self::new(backend, config.history_window)
    }

    pub fn backend(&self) -> &ChatBackend {
        &self.backend
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    pub fn personas(&self) -> &PersonaManager {
        &self.personas
    }

    /// Reply to `message` in character
    ///
    /// Only the last `history_window` exchanges of `history` reach the model. Generation
    /// errors are returned as a string starting with [`ERROR_MARKER`].
    pub async fn respond(
        &self,
        message: &str,
        history: &[(String, String)],
        persona_id: PersonaId,
    ) -> String {
        let ChatBackend::Ready { generator, .. } = &self.backend else {
            return UNAVAILABLE_MESSAGE.to_string();
        };

        let Some(persona) = self.personas.get_persona(persona_id) else {
            error!("Persona {persona_id} missing from persona table");
            return format!("{ERROR_MARKER}unknown persona {persona_id}");
        };

        let transcript = PromptBuilder::new(persona)
            .with_history(history)
            .with_window(self.history_window)
            .build(message);

        debug!(
            "Generating reply as {} ({} history exchanges, {} transcript chars)",
            persona.name,
            history.len().min(self.history_window),
            transcript.chars().count()
        );

        match generator.generate(&transcript, &persona.generation).await {
            Ok(raw) => touch_up(persona_id, raw.trim()),
            Err(e) => {
                error!("Generation failed for {persona_id}: {e}");
                format!("{ERROR_MARKER}{e}")
            }
        }
    }
}
