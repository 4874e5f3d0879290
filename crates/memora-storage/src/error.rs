//! Storage error types for memora-storage.
//!
//! [`StorageError`] covers all anticipated failure modes in the storage
//! layer: SQLite and serialization failures, entity-not-found variants for
//! cards and review states, and integrity violations.

use memora_core::{CardId, DeckId, UserId};
use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// A card was not found in the given deck.
    #[error("card not found: deck={deck}, card={card}")]
    CardNotFound { deck: DeckId, card: CardId },

    /// No review state exists yet for the (deck, card, user) triple.
    ///
    /// For review recording this is the expected signal to seed the default
    /// state, not a failure.
    #[error("review state not found: deck={deck}, card={card}, user={user}")]
    ProgressNotFound {
        deck: DeckId,
        card: CardId,
        user: UserId,
    },

    /// A data integrity violation was detected.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}

impl StorageError {
    /// Returns `true` for the not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::CardNotFound { .. } | StorageError::ProgressNotFound { .. }
        )
    }
}
