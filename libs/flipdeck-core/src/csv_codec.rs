//! Two-column CSV exchange format.
//!
//! # Format
//! ```text
//! front,back
//! Hello,こんにちは
//! "Good morning, Sir",おはようございます
//! ```
//!
//! Extra columns are ignored. Rows without a front or a back are skipped.

use std::io::Read;

use crate::error::{Error, Result};
use crate::types::{Card, NewCard};

/// Suggested file name for exported decks.
pub const EXPORT_FILE_NAME: &str = "cards_export.csv";

const HEADERS: [&str; 2] = ["front", "back"];

/// Cards read from a CSV document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvImport {
    pub cards: Vec<NewCard>,
    /// Rows dropped for a missing front or back.
    pub skipped: usize,
}

/// Parse CSV text with a `front,back` header row.
pub fn parse_cards<R: Read>(reader: R) -> Result<CsvImport> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or(Error::MissingColumn(name))
    };
    let front_col = column("front")?;
    let back_col = column("back")?;

    let mut import = CsvImport::default();
    for record in reader.records() {
        let record = record?;
        let front = record.get(front_col).map(str::trim).unwrap_or_default();
        let back = record.get(back_col).map(str::trim).unwrap_or_default();
        if front.is_empty() || back.is_empty() {
            import.skipped += 1;
            continue;
        }
        import.cards.push(NewCard::new(front, back));
    }

    tracing::debug!(
        cards = import.cards.len(),
        skipped = import.skipped,
        "parsed csv"
    );
    Ok(import)
}

/// Parse CSV from a string.
pub fn parse_cards_str(content: &str) -> Result<CsvImport> {
    parse_cards(content.as_bytes())
}

/// Serialize the front and back of each card. Images and flags are dropped.
pub fn export_cards<'a, I>(cards: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Card>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;
    for card in cards {
        writer.write_record([card.front.as_str(), card.back.as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Csv(e.into_error().into()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
