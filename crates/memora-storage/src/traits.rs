//! The [`CardStore`] and [`ProgressStore`] traits defining the storage
//! contract for decks and review progress.
//!
//! All backends (InMemoryStore, SqliteStore, etc.) implement both traits,
//! ensuring they are fully swappable without changing engine logic. The
//! traits are synchronous (not async): callers own the threading model and
//! the SQLite backend's `Connection` is single-threaded anyway.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use memora_core::{Card, CardId, DeckId, ReviewState, UserId};

use crate::error::StorageError;
use crate::types::{DueEntry, DueKey};

/// The storage contract for card documents.
pub trait CardStore {
    /// Inserts or replaces a card in a deck.
    fn put_card(&mut self, deck: &DeckId, card: &Card) -> Result<(), StorageError>;

    /// Retrieves a card by ID.
    fn get_card(&self, deck: &DeckId, card: &CardId) -> Result<Card, StorageError>;

    /// Deletes a card. Any review state referencing it is left in place;
    /// the due sub-feed skips dangling references when fetching payloads.
    fn delete_card(&mut self, deck: &DeckId, card: &CardId) -> Result<(), StorageError>;

    /// Returns up to `limit` cards in the deck, ordered by card ID
    /// ascending, strictly after `after` (all cards from the start when
    /// `None`).
    fn list_deck_page(
        &self,
        deck: &DeckId,
        after: Option<&CardId>,
        limit: usize,
    ) -> Result<Vec<Card>, StorageError>;

    /// Batch-fetches cards by reference, preserving the order of `refs`.
    ///
    /// References to cards that no longer exist are skipped silently; a
    /// deleted card must not fail the whole batch.
    fn get_cards_by_refs(
        &self,
        deck: &DeckId,
        refs: &[CardId],
    ) -> Result<Vec<Card>, StorageError>;
}

/// The storage contract for per-(card, user) review state.
pub trait ProgressStore {
    /// Retrieves the review state for a (deck, card, user) triple.
    ///
    /// Returns [`StorageError::ProgressNotFound`] when the user has never
    /// reviewed the card -- the definition of "unstudied".
    fn get_review_state(
        &self,
        deck: &DeckId,
        card: &CardId,
        user: &UserId,
    ) -> Result<ReviewState, StorageError>;

    /// Inserts or replaces the review state for a (deck, card, user) triple.
    /// Last write wins; there is no optimistic locking.
    fn put_review_state(
        &mut self,
        deck: &DeckId,
        card: &CardId,
        user: &UserId,
        state: &ReviewState,
    ) -> Result<(), StorageError>;

    /// Returns the full set of card IDs the user has reviewed in the deck.
    /// The unstudied sub-feed filters against this set.
    fn list_state_keys(
        &self,
        deck: &DeckId,
        user: &UserId,
    ) -> Result<HashSet<CardId>, StorageError>;

    /// Returns up to `limit` review states with `due_at <= now`, ordered by
    /// `(due_at, card_id)` ascending, strictly after the `after` key (from
    /// the start when `None`).
    fn list_due_page(
        &self,
        deck: &DeckId,
        user: &UserId,
        now: DateTime<Utc>,
        after: Option<&DueKey>,
        limit: usize,
    ) -> Result<Vec<DueEntry>, StorageError>;
}
