//! Transcript construction for persona chat
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Fluent builder for the turn-formatted transcript

use super::Persona;

/// Default number of (user, assistant) pairs kept in a transcript
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

/// The last `window` pairs of `history`
pub fn recent_history(history: &[(String, String)], window: usize) -> &[(String, String)] {
    &history[history.len().saturating_sub(window)..]
}

/// Builder for the transcript sent to the model
///
/// Layout, one entry per line:
/// - persona system prompt
/// - `Human: <user>` / `<Name>: <reply>` for each retained exchange
/// - `Human: <message>`
/// - `<Name>:` so the model continues in character
///
/// # Example
///
/// ```ignore
/// let transcript = PromptBuilder::new(persona)
///     .with_history(&history)
///     .with_window(6)
///     .build("Hello");
/// ```
pub struct PromptBuilder<'a> {
    persona: &'a Persona,
    history: &'a [(String, String)],
    window: usize,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(persona: &'a Persona) -> Self {
        Self {
            persona,
            history: &[],
            window: DEFAULT_HISTORY_WINDOW,
        }
    }

    /// Set the conversation so far (oldest first)
    pub fn with_history(mut self, history: &'a [(String, String)]) -> Self {
        self.history = history;
        self
    }

    /// Set how many recent exchanges to keep
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Build the final transcript for `message`
    pub fn build(self, message: &str) -> String {
        let name = &self.persona.name;
        let retained = recent_history(self.history, self.window);

        let mut lines = Vec::with_capacity(retained.len() * 2 + 3);
        lines.push(self.persona.system_prompt.clone());

        for (user_msg, bot_msg) in retained {
            lines.push(format!("Human: {user_msg}"));
            lines.push(format!("{name}: {bot_msg}"));
        }

        lines.push(format!("Human: {message}"));
        lines.push(format!("{name}:"));

        lines.join("\n")
    }
}
