//! # Feature: Persona System
//!
//! Character personas (naruto, sasuke, sakura), each with a system prompt loaded from
//! prompt/*.md at compile time and its own decoding parameters.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Per-persona generation config (temperature, max tokens, top_p)
//! - 1.0.0: Initial release with 3 personas

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::llm::GenerationConfig;

/// Closed set of character identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaId {
    Naruto,
    Sasuke,
    Sakura,
}

impl PersonaId {
    pub const ALL: [PersonaId; 3] = [PersonaId::Naruto, PersonaId::Sasuke, PersonaId::Sakura];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaId::Naruto => "naruto",
            PersonaId::Sasuke => "sasuke",
            PersonaId::Sakura => "sakura",
        }
    }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonaId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PersonaId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown persona '{}'. Expected one of: naruto, sasuke, sakura",
                    s.trim()
                )
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: PersonaId,
    /// Speaker label used in transcripts
    pub name: String,
    pub system_prompt: String,
    pub description: String,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone)]
pub struct PersonaManager {
    personas: HashMap<PersonaId, Persona>,
}

impl Default for PersonaManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonaManager {
    pub fn new() -> Self {
        let mut personas = HashMap::new();

        // Prompts embedded at compile time; trailing newline dropped so transcripts stay tight
        personas.insert(
            PersonaId::Naruto,
            Persona {
                id: PersonaId::Naruto,
                name: "Naruto".to_string(),
                system_prompt: include_str!("../../../prompt/naruto.md").trim_end().to_string(),
                description: "A loud, never-give-up ninja who dreams of becoming Hokage"
                    .to_string(),
                generation: GenerationConfig {
                    temperature: 0.95,
                    max_output_tokens: 500,
                    top_p: 0.9,
                },
            },
        );

        personas.insert(
            PersonaId::Sasuke,
            Persona {
                id: PersonaId::Sasuke,
                name: "Sasuke".to_string(),
                system_prompt: include_str!("../../../prompt/sasuke.md").trim_end().to_string(),
                description: "The last Uchiha, cold and terse, driven by power and redemption"
                    .to_string(),
                generation: GenerationConfig {
                    temperature: 0.6,
                    max_output_tokens: 300,
                    top_p: 0.8,
                },
            },
        );

        personas.insert(
            PersonaId::Sakura,
            Persona {
                id: PersonaId::Sakura,
                name: "Sakura".to_string(),
                system_prompt: include_str!("../../../prompt/sakura.md").trim_end().to_string(),
                description: "A medical ninja with monstrous strength and a caring, blunt voice"
                    .to_string(),
                generation: GenerationConfig {
                    temperature: 0.8,
                    max_output_tokens: 400,
                    top_p: 0.85,
                },
            },
        );

        PersonaManager { personas }
    }

    pub fn get_persona(&self, id: PersonaId) -> Option<&Persona> {
        self.personas.get(&id)
    }

    /// Personas in declaration order
    pub fn list_personas(&self) -> Vec<&Persona> {
        PersonaId::ALL
            .iter()
            .filter_map(|id| self.personas.get(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_manager_creation() {
        let manager = PersonaManager::new();
        for id in PersonaId::ALL {
            assert!(manager.get_persona(id).is_some(), "missing persona {id}");
        }
    }

    #[test]
    fn test_persona_ids_match_records() {
        let manager = PersonaManager::new();
        for persona in manager.list_personas() {
            assert!(!persona.name.is_empty());
            assert!(!persona.description.is_empty());
            assert!(!persona.system_prompt.is_empty());
            assert_eq!(manager.get_persona(persona.id).unwrap().name, persona.name);
        }
        assert_eq!(manager.list_personas().len(), 3);
    }

    #[test]
    fn test_display_names() {
        let manager = PersonaManager::new();
        assert_eq!(manager.get_persona(PersonaId::Naruto).unwrap().name, "Naruto");
        assert_eq!(manager.get_persona(PersonaId::Sasuke).unwrap().name, "Sasuke");
        assert_eq!(manager.get_persona(PersonaId::Sakura).unwrap().name, "Sakura");
    }

    #[test]
    fn test_generation_configs() {
        let manager = PersonaManager::new();

        let naruto = manager.get_persona(PersonaId::Naruto).unwrap();
        assert_eq!(naruto.generation.max_output_tokens, 500);
        assert_eq!(naruto.generation.temperature, 0.95);
        assert_eq!(naruto.generation.top_p, 0.9);

        let sasuke = manager.get_persona(PersonaId::Sasuke).unwrap();
        assert_eq!(sasuke.generation.max_output_tokens, 300);
        assert_eq!(sasuke.generation.temperature, 0.6);

        let sakura = manager.get_persona(PersonaId::Sakura).unwrap();
        assert_eq!(sakura.generation.max_output_tokens, 400);
        assert_eq!(sakura.generation.top_p, 0.85);
    }

    #[test]
    fn test_naruto_prompt_loaded() {
        let manager = PersonaManager::new();
        let naruto = manager.get_persona(PersonaId::Naruto).unwrap();

        assert!(naruto.system_prompt.starts_with("You ARE Naruto Uzumaki."));
        assert!(naruto.system_prompt.contains("DATTEBAYO!"));
        assert!(naruto.system_prompt.contains("Rasengan"));
        assert!(!naruto.system_prompt.ends_with('\n'));
    }

    #[test]
    fn test_sasuke_prompt_loaded() {
        let manager = PersonaManager::new();
        let sasuke = manager.get_persona(PersonaId::Sasuke).unwrap();

        assert!(sasuke.system_prompt.contains("Sasuke Uchiha"));
        assert!(sasuke.system_prompt.contains("Sharingan"));
        assert!(sasuke.system_prompt.contains("No exclamations"));
    }

    #[test]
    fn test_sakura_prompt_loaded() {
        let manager = PersonaManager::new();
        let sakura = manager.get_persona(PersonaId::Sakura).unwrap();

        assert!(sakura.system_prompt.contains("Sakura Haruno"));
        assert!(sakura.system_prompt.contains("SHANNARO!"));
        assert!(sakura.system_prompt.contains("Tsunade"));
    }

    #[test]
    fn test_persona_id_parsing() {
        assert_eq!("naruto".parse::<PersonaId>().unwrap(), PersonaId::Naruto);
        assert_eq!(" Sasuke ".parse::<PersonaId>().unwrap(), PersonaId::Sasuke);
        assert_eq!("SAKURA".parse::<PersonaId>().unwrap(), PersonaId::Sakura);

        let err = "kakashi".parse::<PersonaId>().unwrap_err();
        assert!(err.to_string().contains("kakashi"));
    }

    #[test]
    fn test_persona_id_display_round_trip() {
        for id in PersonaId::ALL {
            assert_eq!(id.to_string().parse::<PersonaId>().unwrap(), id);
        }
    }

    #[test]
    fn test_persona_id_serde() {
        let json = serde_json::to_string(&PersonaId::Sakura).unwrap();
        assert_eq!(json, "\"sakura\"");
    }
}
