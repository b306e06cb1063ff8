//! Card endpoints

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;
use flipdeck_core::csv_codec;

/// Parse an opaque card id; anything that is not ours simply does not exist.
fn parse_card_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| ApiError::NotFound(format!("Card {}", id)))
}

/// GET /api/cards
pub async fn list(State(state): State<AppState>) -> Result<Json<CardListResponse>> {
    let cards = state.db.list_cards().await?;
    Ok(Json(CardListResponse {
        cards: cards.iter().map(DbCard::to_api_card).collect(),
    }))
}

/// GET /api/cards/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Card>> {
    let card_id = parse_card_id(&id)?;
    let card = state
        .db
        .get_card(card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Card {}", id)))?;
    Ok(Json(card.to_api_card()))
}

/// POST /api/cards
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewCard>,
) -> Result<(StatusCode, Json<Card>)> {
    payload.validate()?;
    let card = state.db.create_card(&payload).await?;
    tracing::info!(id = %card.id, "card created");
    Ok((StatusCode::CREATED, Json(card.to_api_card())))
}

/// PATCH /api/cards/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CardUpdate>,
) -> Result<Json<Card>> {
    let card_id = parse_card_id(&id)?;
    if payload.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    payload.validate()?;
    let card = state
        .db
        .update_card(card_id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Card {}", id)))?;
    tracing::info!(id = %card.id, "card updated");
    Ok(Json(card.to_api_card()))
}

/// DELETE /api/cards/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let card_id = parse_card_id(&id)?;
    if !state.db.delete_card(card_id).await? {
        return Err(ApiError::NotFound(format!("Card {}", id)));
    }
    tracing::info!(%card_id, "card deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/cards/bulk-delete
pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>> {
    // Unknown ids cannot exist in the store, so they are not an error here.
    let ids: Vec<Uuid> = payload
        .ids
        .iter()
        .filter_map(|id| Uuid::parse_str(id).ok())
        .collect();
    let deleted = state.db.delete_cards(&ids).await?;
    tracing::info!(requested = payload.ids.len(), deleted, "bulk delete");
    Ok(Json(BulkDeleteResponse { deleted }))
}

/// POST /api/cards/import
pub async fn import(State(state): State<AppState>, body: String) -> Result<Json<ImportResponse>> {
    let parsed = csv_codec::parse_cards_str(&body)?;
    let created = state.db.create_cards(&parsed.cards).await?;
    tracing::info!(
        imported = created.len(),
        skipped = parsed.skipped,
        "csv import"
    );
    Ok(Json(ImportResponse {
        imported: created.iter().map(DbCard::to_api_card).collect(),
        skipped: parsed.skipped,
    }))
}

/// GET /api/cards/export
pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let cards: Vec<Card> = state
        .db
        .list_cards()
        .await?
        .iter()
        .map(DbCard::to_api_card)
        .collect();
    let csv = csv_codec::export_cards(&cards)?;
    let disposition = format!("attachment; filename=\"{}\"", csv_codec::EXPORT_FILE_NAME);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
