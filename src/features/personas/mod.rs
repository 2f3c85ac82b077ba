//! # Personas Feature
//!
//! Character persona table, transcript building and reply touch-ups.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add touch_up() for persona voice post-processing
//! - 1.0.0: Initial release

pub mod manager;
pub mod prompt_builder;
pub mod touch_up;

pub use manager::{Persona, PersonaId, PersonaManager};
pub use prompt_builder::{recent_history, PromptBuilder, DEFAULT_HISTORY_WINDOW};
pub use touch_up::touch_up;
