//! Feature modules

pub mod chatbot;
pub mod personas;
pub mod session;

pub use chatbot::{
    CharacterChatbot, ChatBackend, UnavailableReason, ERROR_MARKER, UNAVAILABLE_MESSAGE,
};
pub use personas::{touch_up, Persona, PersonaId, PersonaManager, PromptBuilder};
pub use session::{ChatSession, SessionCommand};
