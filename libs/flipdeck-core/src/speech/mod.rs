//! Text-to-speech sequencing.
//!
//! The host platform provides a [`SpeechService`]; the [`Narrator`] decides
//! which language and voice each utterance uses and guarantees that only the
//! most recent request is ever heard.

pub mod catalog;
pub mod narrator;
pub mod voice;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use catalog::VoiceCatalog;
pub use narrator::Narrator;
pub use voice::select_voice;

/// Language profile chosen for an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Japanese,
}

impl Language {
    /// Any character outside 7-bit ASCII routes to Japanese.
    pub fn detect(text: &str) -> Self {
        if text.chars().any(|c| !c.is_ascii()) {
            Self::Japanese
        } else {
            Self::English
        }
    }

    /// BCP 47 tag handed to the speech engine.
    pub fn tag(self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::Japanese => "ja-JP",
        }
    }

    fn primary_subtag(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Japanese => "ja",
        }
    }

    /// Whether a host voice language (`en-US`, `en_GB`, `ja`) belongs to this profile.
    pub fn matches(self, voice_lang: &str) -> bool {
        let primary = voice_lang
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default();
        primary.eq_ignore_ascii_case(self.primary_subtag())
    }
}

/// A voice offered by the host speech engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub lang: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
            is_default: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// A single playback request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub lang: Language,
    /// Name of the preferred voice; `None` lets the host pick for `lang`.
    pub voice: Option<String>,
}

/// Host text-to-speech capability.
pub trait SpeechService: Send + Sync + 'static {
    /// Stop any utterance currently playing.
    fn cancel_all(&self);

    /// Start playing an utterance. Never blocks on playback.
    fn speak(&self, utterance: Utterance);

    /// Voices known so far. May be empty until the host has loaded them.
    fn available_voices(&self) -> Vec<Voice>;
}

/// Voice preferences and the voice-loading timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Ranked voice names for English text.
    pub english_voices: Vec<String>,
    /// Ranked voice names for Japanese text.
    pub japanese_voices: Vec<String>,
    /// How long an utterance waits for the host to report voices.
    pub voice_wait_ms: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            english_voices: vec![
                "Samantha".to_string(),
                "Google US English".to_string(),
                "Microsoft Aria Online (Natural) - English (United States)".to_string(),
                "en-us".to_string(),
            ],
            japanese_voices: vec![
                "Kyoko".to_string(),
                "O-ren".to_string(),
                "Google 日本語".to_string(),
                "Microsoft Nanami Online (Natural) - Japanese (Japan)".to_string(),
                "ja".to_string(),
            ],
            voice_wait_ms: 3000,
        }
    }
}

impl SpeechConfig {
    pub fn preferred(&self, lang: Language) -> &[String] {
        match lang {
            Language::English => &self.english_voices,
            Language::Japanese => &self.japanese_voices,
        }
    }

    pub fn voice_wait(&self) -> Duration {
        Duration::from_millis(self.voice_wait_ms)
    }
}
