//! Storage-layer types for the due sub-feed.
//!
//! These live here (not in memora-core) because the `(due_at, card_id)`
//! composite key is a storage concern: it exists only to make the due
//! sub-feed's ordering deterministic and its pagination resumable.

use chrono::{DateTime, Utc};
use memora_core::{CardId, ReviewState};
use serde::{Deserialize, Serialize};

/// Resume key for the due sub-feed: the `(due_at, card_id)` pair of the last
/// state entry a page matched.
///
/// The card-ID tiebreak keeps entries with identical due timestamps in a
/// stable order between calls, which the cursor's resume guarantee depends
/// on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueKey {
    pub due_at: DateTime<Utc>,
    pub card_id: CardId,
}

/// One due sub-feed match: the card reference plus its review state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueEntry {
    pub card_id: CardId,
    pub state: ReviewState,
}

impl DueEntry {
    /// The resume key this entry contributes to the cursor.
    pub fn key(&self) -> DueKey {
        DueKey {
            due_at: self.state.due_at,
            card_id: self.card_id.clone(),
        }
    }
}
