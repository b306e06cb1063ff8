//! Voice selection for an utterance.

use super::{Language, Voice};

/// Pick the voice for `lang`.
///
/// The first ranked `preferred` name available for the language wins; next the
/// host's default voice for the language. `None` leaves the choice to the host.
pub fn select_voice<'a>(lang: Language, preferred: &[String], voices: &'a [Voice]) -> Option<&'a Voice> {
    preferred
        .iter()
        .find_map(|name| {
            voices
                .iter()
                .find(|v| v.name.eq_ignore_ascii_case(name) && lang.matches(&v.lang))
        })
        .or_else(|| voices.iter().find(|v| v.is_default && lang.matches(&v.lang)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voices() -> Vec<Voice> {
        vec![
            Voice::new("Alex", "en-US").as_default(),
            Voice::new("Samantha", "en-US"),
            Voice::new("Kyoko", "ja-JP"),
            Voice::new("Otoya", "ja-JP").as_default(),
        ]
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ranked_preference_wins() {
        let voices = voices();
        let preferred = names(&["Missing", "Kyoko", "Otoya"]);
        let voice = select_voice(Language::Japanese, &preferred, &voices).unwrap();
        assert_eq!(voice.name, "Kyoko");
    }

    #[test]
    fn preference_must_match_language() {
        let voices = voices();
        let preferred = names(&["Kyoko"]);
        let voice = select_voice(Language::English, &preferred, &voices).unwrap();
        assert_eq!(voice.name, "Alex");
    }

    #[test]
    fn falls_back_to_default_for_language() {
        let voices = voices();
        let voice = select_voice(Language::Japanese, &[], &voices).unwrap();
        assert_eq!(voice.name, "Otoya");
    }

    #[test]
    fn no_match_leaves_choice_to_host() {
        let voices = vec![Voice::new("Samantha", "en-US")];
        assert!(select_voice(Language::Japanese, &names(&["Kyoko"]), &voices).is_none());
        assert!(select_voice(Language::English, &[], &[]).is_none());
    }
}
