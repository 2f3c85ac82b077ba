//! Persona voice touch-ups applied to generated replies
//!
//! Plain substring checks, case-sensitive where the marker is. Every rule leaves text
//! that already carries its marker alone, so applying a touch-up twice is a no-op.

use super::PersonaId;

pub const NARUTO_CATCHPHRASE: &str = "Believe it, dattebayo!";
pub const SASUKE_FILLER: &str = "Hmm";
pub const SASUKE_INTERJECTION: &str = "Hn.";
pub const SAKURA_BATTLE_CRY: &str = "SHANNARO!";

/// Replies shorter than this get the catchphrase appended as-is
const NARUTO_SHORT_CHARS: usize = 100;
/// Only replies under this many words get the battle cry
const SAKURA_MAX_WORDS: usize = 30;

/// Apply the persona's touch-up to an already trimmed reply
pub fn touch_up(persona: PersonaId, response: &str) -> String {
    match persona {
        PersonaId::Naruto => naruto(response),
        PersonaId::Sasuke => sasuke(response),
        PersonaId::Sakura => sakura(response),
    }
}

fn naruto(response: &str) -> String {
    let lower = response.to_lowercase();
    if lower.contains("dattebayo") || lower.contains("believe it") {
        return response.to_string();
    }

    if response.chars().count() < NARUTO_SHORT_CHARS {
        if response.ends_with(['.', '!', '?']) {
            format!("{response} {NARUTO_CATCHPHRASE}")
        } else {
            format!("{response}! {NARUTO_CATCHPHRASE}")
        }
    } else {
        format!(
            "{}! {NARUTO_CATCHPHRASE}",
            response.trim_end_matches(['.', '!'])
        )
    }
}

fn sasuke(response: &str) -> String {
    response.replace(SASUKE_FILLER, SASUKE_INTERJECTION)
}

fn sakura(response: &str) -> String {
    let lower = response.to_lowercase();
    if lower.contains("strength")
        && !lower.contains("shannaro")
        && response.split_whitespace().count() < SAKURA_MAX_WORDS
    {
        format!(
            "{} {SAKURA_BATTLE_CRY}",
            response.trim_end_matches(['.', '!'])
        )
    } else {
        response.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "Hi there",
        "Ramen is the best.",
        "Hmm. Hmm, fine.",
        "My strength comes from Tsunade.",
        "",
        "I will never give up on my friends, no matter how hard the training gets or how many times I fall down along the way!!",
    ];

    #[test]
    fn test_naruto_short_response() {
        assert_eq!(
            touch_up(PersonaId::Naruto, "Hi there"),
            "Hi there! Believe it, dattebayo!"
        );
    }

    #[test]
    fn test_naruto_short_response_with_punctuation() {
        assert_eq!(
            touch_up(PersonaId::Naruto, "Let's eat ramen!"),
            "Let's eat ramen! Believe it, dattebayo!"
        );
    }

    #[test]
    fn test_naruto_long_response_strips_trailing_punctuation() {
        let long = format!("{}...", "I'm going to be Hokage ".repeat(6).trim_end());
        assert!(long.chars().count() >= 100);
        let result = touch_up(PersonaId::Naruto, &long);
        assert!(result.ends_with("Hokage! Believe it, dattebayo!"));
        assert!(!result.contains("..."));
    }

    #[test]
    fn test_naruto_existing_catchphrase_untouched() {
        let text = "I'll protect everyone, DATTEBAYO!";
        assert_eq!(touch_up(PersonaId::Naruto, text), text);

        let text = "Believe it! Ramen time.";
        assert_eq!(touch_up(PersonaId::Naruto, text), text);
    }

    #[test]
    fn test_sasuke_replaces_filler() {
        assert_eq!(
            touch_up(PersonaId::Sasuke, "Hmm, you're still weak."),
            "Hn., you're still weak."
        );
    }

    #[test]
    fn test_sasuke_case_sensitive() {
        let text = "hmm. HMM.";
        assert_eq!(touch_up(PersonaId::Sasuke, text), text);
    }

    #[test]
    fn test_sasuke_without_filler_unchanged() {
        let text = "Power is everything.";
        assert_eq!(touch_up(PersonaId::Sasuke, text), text);
    }

    #[test]
    fn test_sakura_strength_short_response() {
        assert_eq!(
            touch_up(PersonaId::Sakura, "My strength comes from Tsunade."),
            "My strength comes from Tsunade SHANNARO!"
        );
    }

    #[test]
    fn test_sakura_long_response_unchanged() {
        let text = format!("Strength {}", "matters a lot ".repeat(12));
        assert!(text.split_whitespace().count() >= 30);
        assert_eq!(touch_up(PersonaId::Sakura, &text), text);
    }

    #[test]
    fn test_sakura_without_strength_unchanged() {
        let text = "Let me heal that wound.";
        assert_eq!(touch_up(PersonaId::Sakura, text), text);
    }

    #[test]
    fn test_sakura_existing_battle_cry_untouched() {
        let text = "Feel my strength, shannaro!";
        assert_eq!(touch_up(PersonaId::Sakura, text), text);
    }

    #[test]
    fn test_touch_up_idempotent() {
        for id in PersonaId::ALL {
            for sample in SAMPLES {
                let once = touch_up(id, sample);
                let twice = touch_up(id, &once);
                assert_eq!(once, twice, "{id} not idempotent for {sample:?}");
            }
        }
    }
}
