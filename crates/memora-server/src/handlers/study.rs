//! Due-card feed handler.

use axum::extract::{Path, Query, State};
use axum::Json;

use memora_core::{DeckId, UserId};

use crate::error::ApiError;
use crate::schema::study::{DueFeedPageResponse, DueFeedParams};
use crate::state::AppState;

/// Page size applied when the client omits `limit`.
const DEFAULT_PAGE_SIZE: usize = 20;

/// Returns one page of cards to study, unstudied before due.
///
/// `GET /decks/{deck_id}/cards/progress/{user_id}/due?limit&cursor`
pub async fn get_due_feed(
    State(state): State<AppState>,
    Path((deck_id, user_id)): Path<(String, String)>,
    Query(params): Query<DueFeedParams>,
) -> Result<Json<DueFeedPageResponse>, ApiError> {
    let service = state.service.lock().await;
    let page = service.due_feed_page(
        &DeckId::new(deck_id),
        &UserId::new(user_id),
        params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        params.cursor.as_deref().unwrap_or(""),
    )?;
    Ok(Json(page))
}
