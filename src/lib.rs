// Core layer - configuration
pub mod core;

// Features layer - persona chat pipeline and session state
pub mod features;

// LLM layer - hosted text generation backends
pub mod llm;

pub use core::{Config, LlmProvider};

pub use features::{
    // Chatbot
    CharacterChatbot, ChatBackend, UnavailableReason, ERROR_MARKER, UNAVAILABLE_MESSAGE,
    // Personas
    touch_up, Persona, PersonaId, PersonaManager, PromptBuilder,
    // Session
    ChatSession, SessionCommand,
};

pub use llm::{GenerationConfig, ModelProvider, TextGenerator};
