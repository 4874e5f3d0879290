//! Review progress handlers (read state, record a review).

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use memora_core::{CardId, DeckId, ReviewState, UserId};

use crate::error::ApiError;
use crate::schema::progress::RatingRequest;
use crate::state::AppState;

/// Upper bound on a background review-recording attempt.
const RECORD_REVIEW_TIMEOUT: Duration = Duration::from_secs(30);

/// Reads the review state for one card.
///
/// `GET /decks/{deck_id}/cards/{card_id}/progress/{user_id}`
///
/// 404 when the user has never reviewed the card.
pub async fn get_progress(
    State(state): State<AppState>,
    Path((deck_id, card_id, user_id)): Path<(String, String, String)>,
) -> Result<Json<ReviewState>, ApiError> {
    let service = state.service.lock().await;
    let progress = service.get_review_state(
        &DeckId::new(deck_id),
        &CardId::new(card_id),
        &UserId::new(user_id),
    )?;
    Ok(Json(progress))
}

/// Records a review and responds immediately with 202 Accepted.
///
/// `PUT /decks/{deck_id}/cards/{card_id}/progress/{user_id}`
///
/// The rating is validated by the body extractor; the state update itself
/// runs in a detached task bounded by [`RECORD_REVIEW_TIMEOUT`]. A timeout
/// or storage failure there is logged and dropped: the card's due date just
/// stays where it was, delaying its next appearance rather than corrupting
/// anything.
pub async fn update_progress(
    State(state): State<AppState>,
    Path((deck_id, card_id, user_id)): Path<(String, String, String)>,
    Json(req): Json<RatingRequest>,
) -> StatusCode {
    tokio::spawn(async move {
        let deck = DeckId::new(deck_id);
        let card = CardId::new(card_id);
        let user = UserId::new(user_id);

        let result = tokio::time::timeout(RECORD_REVIEW_TIMEOUT, async {
            let mut service = state.service.lock().await;
            service.record_review(&deck, &card, &user, req.rating)
        })
        .await;

        match result {
            Err(_) => tracing::warn!(
                deck = %deck, card = %card, user = %user,
                "review update timed out"
            ),
            Ok(Err(err)) => tracing::warn!(
                deck = %deck, card = %card, user = %user, error = %err,
                "review update failed"
            ),
            Ok(Ok(_)) => {}
        }
    });

    StatusCode::ACCEPTED
}
