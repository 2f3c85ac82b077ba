//! # Feature: Chat Session
//!
//! Caller-side conversation state for the terminal front end: the active persona and the
//! exchanges so far. The chatbot itself never stores history.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

use crate::features::personas::PersonaId;

/// A slash command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Switch persona; history is cleared
    Persona(PersonaId),
    ListPersonas,
    Reset,
    Status,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parse a `/command`. Returns `None` for ordinary chat input, `Some(Err)` for a
    /// malformed command.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();

        let command = match (name.as_str(), arg) {
            ("persona", Some(id)) => id
                .parse::<PersonaId>()
                .map(SessionCommand::Persona)
                .map_err(|e| e.to_string()),
            ("persona", None) => Err("Usage: /persona <naruto|sasuke|sakura>".to_string()),
            ("personas", _) => Ok(SessionCommand::ListPersonas),
            ("reset", _) => Ok(SessionCommand::Reset),
            ("status", _) => Ok(SessionCommand::Status),
            ("help", _) => Ok(SessionCommand::Help),
            ("quit" | "exit", _) => Ok(SessionCommand::Quit),
            (other, _) => Err(format!("Unknown command '/{other}'. Type /help for commands")),
        };
        Some(command)
    }
}

pub const HELP_TEXT: &str = "\
Commands:
  /persona <id>   switch character (clears history)
  /personas       list characters
  /reset          clear conversation history
  /status         show model availability
  /help           show this help
  /quit           leave";

#[derive(Debug, Clone)]
pub struct ChatSession {
    persona: PersonaId,
    history: Vec<(String, String)>,
}

impl ChatSession {
    pub fn new(persona: PersonaId) -> Self {
        Self {
            persona,
            history: Vec::new(),
        }
    }

    pub fn persona(&self) -> PersonaId {
        self.persona
    }

    pub fn history(&self) -> &[(String, String)] {
        &self.history
    }

    /// Change persona, starting a fresh conversation
    pub fn switch_persona(&mut self, persona: PersonaId) {
        self.persona = persona;
        self.history.clear();
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Record a completed exchange
    pub fn record(&mut self, message: &str, reply: &str) {
        self.history.push((message.to_string(), reply.to_string()));
    }
}
