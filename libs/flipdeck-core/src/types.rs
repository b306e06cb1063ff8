//! Core types for the flashcard application.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// A study card as held by the card store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub checked: bool,
}

impl Card {
    /// Text written on the given side.
    pub fn text(&self, side: Side) -> &str {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        }
    }

    /// What to render for the given side. The front image wins over the front text.
    pub fn face(&self, side: Side) -> Face<'_> {
        match (side, self.image.as_deref()) {
            (Side::Front, Some(uri)) if !uri.trim().is_empty() => Face::Image {
                uri,
                text: &self.front,
            },
            _ => Face::Text(self.text(side)),
        }
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, update: &CardUpdate) {
        if let Some(front) = &update.front {
            self.front = front.clone();
        }
        if let Some(back) = &update.back {
            self.back = back.clone();
        }
        if let Some(image) = &update.image {
            self.image = image.clone();
        }
        if let Some(checked) = update.checked {
            self.checked = checked;
        }
    }
}

/// Card fields supplied on creation; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCard {
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewCard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Both sides must carry text.
    pub fn validate(&self) -> Result<()> {
        require_text("front", &self.front)?;
        require_text("back", &self.back)
    }
}

/// Partial update of a card. Absent fields are left untouched.
///
/// `image: Some(None)` clears the image, serialized as an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

impl CardUpdate {
    /// Update only the text of both sides.
    pub fn text(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: Some(front.into()),
            back: Some(back.into()),
            ..Self::default()
        }
    }

    pub fn checked(checked: bool) -> Self {
        Self {
            checked: Some(checked),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_none() && self.back.is_none() && self.image.is_none() && self.checked.is_none()
    }

    /// Present text fields must not be blank.
    pub fn validate(&self) -> Result<()> {
        if let Some(front) = &self.front {
            require_text("front", front)?;
        }
        if let Some(back) = &self.back {
            require_text("back", back)?;
        }
        Ok(())
    }
}

fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::EmptyField { field });
    }
    Ok(())
}

fn double_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Side of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Front,
    Back,
}

impl Side {
    pub fn from_flipped(flipped: bool) -> Self {
        if flipped {
            Self::Back
        } else {
            Self::Front
        }
    }
}

/// Renderable content of one side of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face<'a> {
    Text(&'a str),
    Image { uri: &'a str, text: &'a str },
}

impl<'a> Face<'a> {
    /// Text sent to speech, even when an image is rendered.
    pub fn speech_text(&self) -> &'a str {
        match *self {
            Face::Text(text) => text,
            Face::Image { text, .. } => text,
        }
    }
}

/// Cards to study: the checked ones, or every card when none is checked.
pub fn study_deck(cards: &[Card]) -> Vec<Card> {
    if cards.iter().any(|c| c.checked) {
        cards.iter().filter(|c| c.checked).cloned().collect()
    } else {
        cards.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(id: &str, checked: bool) -> Card {
        Card {
            id: id.to_string(),
            front: format!("front {}", id),
            back: format!("back {}", id),
            image: None,
            checked,
        }
    }

    #[test]
    fn new_card_rejects_blank_sides() {
        assert!(NewCard::new("Hello", "こんにちは").validate().is_ok());
        assert!(matches!(
            NewCard::new("  ", "back").validate(),
            Err(Error::EmptyField { field: "front" })
        ));
        assert!(matches!(
            NewCard::new("front", "").validate(),
            Err(Error::EmptyField { field: "back" })
        ));
    }

    #[test]
    fn update_validates_only_present_fields() {
        assert!(CardUpdate::checked(true).validate().is_ok());
        assert!(CardUpdate::text("a", " ").validate().is_err());
    }

    #[test]
    fn image_takes_precedence_on_front_only() {
        let mut c = card("1", false);
        c.image = Some("https://example.com/cat.png".to_string());

        assert_eq!(
            c.face(Side::Front),
            Face::Image {
                uri: "https://example.com/cat.png",
                text: "front 1"
            }
        );
        assert_eq!(c.face(Side::Back), Face::Text("back 1"));
        assert_eq!(c.face(Side::Front).speech_text(), "front 1");
    }

    #[test]
    fn apply_update_clears_image() {
        let mut c = card("1", false);
        c.image = Some("x.png".to_string());
        c.apply(&CardUpdate {
            image: Some(None),
            checked: Some(true),
            ..CardUpdate::default()
        });
        assert_eq!(c.image, None);
        assert!(c.checked);
        assert_eq!(c.front, "front 1");
    }

    #[test]
    fn update_distinguishes_null_image_from_absent() {
        let clear: CardUpdate = serde_json::from_str(r#"{"image": null}"#).unwrap();
        assert_eq!(clear.image, Some(None));

        let untouched: CardUpdate = serde_json::from_str(r#"{"front": "x"}"#).unwrap();
        assert_eq!(untouched.image, None);
        assert!(!untouched.is_empty());
        assert!(CardUpdate::default().is_empty());
    }

    #[test]
    fn study_deck_prefers_checked_cards() {
        let cards = vec![card("1", false), card("2", true), card("3", true)];
        let ids: Vec<_> = study_deck(&cards).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn study_deck_uses_everything_when_nothing_checked() {
        let cards = vec![card("1", false), card("2", false)];
        assert_eq!(study_deck(&cards).len(), 2);
    }
}
