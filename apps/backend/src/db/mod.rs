//! PostgreSQL database operations

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

const CARD_COLUMNS: &str = "id, front, back, image, checked, created_at, updated_at";

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a pool that only connects on first use
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Database(e.into()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Card Repository ===

    /// Get all cards in creation order
    pub async fn list_cards(&self) -> Result<Vec<DbCard>> {
        let cards = sqlx::query_as::<_, DbCard>(&format!(
            "SELECT {} FROM cards ORDER BY created_at, id",
            CARD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    /// Get card by ID
    pub async fn get_card(&self, card_id: Uuid) -> Result<Option<DbCard>> {
        let card = sqlx::query_as::<_, DbCard>(&format!(
            "SELECT {} FROM cards WHERE id = $1",
            CARD_COLUMNS
        ))
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// Insert a new card with a generated id
    pub async fn create_card(&self, card: &NewCard) -> Result<DbCard> {
        let created = sqlx::query_as::<_, DbCard>(&format!(
            r#"
            INSERT INTO cards (id, front, back, image)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            CARD_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&card.front)
        .bind(&card.back)
        .bind(&card.image)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Insert several cards in one transaction
    pub async fn create_cards(&self, cards: &[NewCard]) -> Result<Vec<DbCard>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(cards.len());

        for card in cards {
            let row = sqlx::query_as::<_, DbCard>(&format!(
                r#"
                INSERT INTO cards (id, front, back, image)
                VALUES ($1, $2, $3, $4)
                RETURNING {}
                "#,
                CARD_COLUMNS
            ))
            .bind(Uuid::new_v4())
            .bind(&card.front)
            .bind(&card.back)
            .bind(&card.image)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Apply a partial update; `None` when the card does not exist
    pub async fn update_card(&self, card_id: Uuid, update: &CardUpdate) -> Result<Option<DbCard>> {
        let (set_image, image) = match &update.image {
            Some(image) => (true, image.clone()),
            None => (false, None),
        };

        let card = sqlx::query_as::<_, DbCard>(&format!(
            r#"
            UPDATE cards
            SET front = COALESCE($2, front),
                back = COALESCE($3, back),
                image = CASE WHEN $4 THEN $5 ELSE image END,
                checked = COALESCE($6, checked),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CARD_COLUMNS
        ))
        .bind(card_id)
        .bind(&update.front)
        .bind(&update.back)
        .bind(set_image)
        .bind(image)
        .bind(update.checked)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// Delete a card; false when it did not exist
    pub async fn delete_card(&self, card_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(card_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete several cards, returning how many existed
    pub async fn delete_cards(&self, card_ids: &[Uuid]) -> Result<u64> {
        if card_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM cards WHERE id = ANY($1)")
            .bind(card_ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
