//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from flipdeck-core
pub use flipdeck_core::types::{Card, CardUpdate, NewCard};

// === Database Entity Types ===

/// Card stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCard {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    pub image: Option<String>,
    pub checked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbCard {
    /// Convert to API card type
    pub fn to_api_card(&self) -> Card {
        Card {
            id: self.id.to_string(),
            front: self.front.clone(),
            back: self.back.clone(),
            image: self.image.clone(),
            checked: self.checked,
        }
    }
}

// === API Request/Response Types ===

/// GET /api/cards response
#[derive(Debug, Serialize, Deserialize)]
pub struct CardListResponse {
    pub cards: Vec<Card>,
}

/// POST /api/cards/bulk-delete request
#[derive(Debug, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

/// POST /api/cards/bulk-delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    pub deleted: u64,
}

/// POST /api/cards/import response
#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub imported: Vec<Card>,
    pub skipped: usize,
}
