//! Core flashcard library shared by the card store service and the study client.
//!
//! Provides:
//! - Study session engine (shuffled, wrap-around navigation with flip state)
//! - Speech sequencing (language detection, voice selection, latest-wins playback)
//! - CSV import/export of front/back pairs
//! - Deck editor over an abstract card store, behind a password gate
//! - Shared types (Card, NewCard, CardUpdate, etc.)

pub mod csv_codec;
pub mod editor;
pub mod error;
pub mod gate;
pub mod session;
pub mod speech;
pub mod store;
pub mod types;

pub use csv_codec::{export_cards, parse_cards, parse_cards_str, CsvImport, EXPORT_FILE_NAME};
pub use editor::{DeckEditor, ImportReport};
pub use error::{Error, Result};
pub use gate::{password_digest, EditorKey, PasswordGate};
pub use session::{SessionStatus, StudySession};
pub use speech::{
    select_voice, Language, Narrator, SpeechConfig, SpeechService, Utterance, Voice, VoiceCatalog,
};
pub use store::CardStore;
pub use types::{study_deck, Card, CardUpdate, Face, NewCard, Side};
