//! Due-card feed request/response types.

use memora_core::Card;
use serde::{Deserialize, Serialize};

/// Query parameters for the due-card feed.
#[derive(Debug, Clone, Deserialize)]
pub struct DueFeedParams {
    /// Maximum cards per page; defaults to 20.
    pub limit: Option<usize>,
    /// Opaque resume cursor from the previous page; empty for the first.
    pub cursor: Option<String>,
}

/// One page of the study feed.
#[derive(Debug, Clone, Serialize)]
pub struct DueFeedPageResponse {
    /// Cards to study, unstudied before due.
    pub cards: Vec<Card>,
    /// Opaque cursor to pass back for the next page; empty when exhausted.
    pub next_cursor: String,
    /// Whether either sub-feed may still yield more cards.
    pub has_more: bool,
}
