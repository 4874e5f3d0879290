//! In-memory implementation of the storage contract.
//!
//! [`InMemoryStore`] is a first-class backend for tests and ephemeral
//! setups. It stores decks as ordered maps (card-ID order falls out of the
//! `BTreeMap`) with semantics identical to the SQLite backend.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;

use chrono::{DateTime, Utc};

use memora_core::{Card, CardId, DeckId, ReviewState, UserId};

use crate::error::StorageError;
use crate::traits::{CardStore, ProgressStore};
use crate::types::{DueEntry, DueKey};

/// HashMap/BTreeMap-backed implementation of [`CardStore`] and
/// [`ProgressStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// Cards per deck, ordered by card ID.
    decks: HashMap<DeckId, BTreeMap<CardId, Card>>,
    /// Review states per (deck, user), keyed by card ID.
    progress: HashMap<(DeckId, UserId), HashMap<CardId, ReviewState>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        InMemoryStore::default()
    }
}

impl CardStore for InMemoryStore {
    fn put_card(&mut self, deck: &DeckId, card: &Card) -> Result<(), StorageError> {
        self.decks
            .entry(deck.clone())
            .or_default()
            .insert(card.id.clone(), card.clone());
        Ok(())
    }

    fn get_card(&self, deck: &DeckId, card: &CardId) -> Result<Card, StorageError> {
        self.decks
            .get(deck)
            .and_then(|cards| cards.get(card))
            .cloned()
            .ok_or_else(|| StorageError::CardNotFound {
                deck: deck.clone(),
                card: card.clone(),
            })
    }

    fn delete_card(&mut self, deck: &DeckId, card: &CardId) -> Result<(), StorageError> {
        let removed = self
            .decks
            .get_mut(deck)
            .and_then(|cards| cards.remove(card));
        if removed.is_none() {
            return Err(StorageError::CardNotFound {
                deck: deck.clone(),
                card: card.clone(),
            });
        }
        Ok(())
    }

    fn list_deck_page(
        &self,
        deck: &DeckId,
        after: Option<&CardId>,
        limit: usize,
    ) -> Result<Vec<Card>, StorageError> {
        let Some(cards) = self.decks.get(deck) else {
            return Ok(Vec::new());
        };
        let page = match after {
            Some(after) => cards
                .range::<CardId, _>((Bound::Excluded(after), Bound::Unbounded))
                .take(limit)
                .map(|(_, card)| card.clone())
                .collect(),
            None => cards
                .values()
                .take(limit)
                .cloned()
                .collect(),
        };
        Ok(page)
    }

    fn get_cards_by_refs(
        &self,
        deck: &DeckId,
        refs: &[CardId],
    ) -> Result<Vec<Card>, StorageError> {
        let Some(cards) = self.decks.get(deck) else {
            return Ok(Vec::new());
        };
        // Missing references are skipped, not errors: a card deleted after
        // its review state was written must not fail the whole batch.
        Ok(refs
            .iter()
            .filter_map(|card_id| cards.get(card_id).cloned())
            .collect())
    }
}

impl ProgressStore for InMemoryStore {
    fn get_review_state(
        &self,
        deck: &DeckId,
        card: &CardId,
        user: &UserId,
    ) -> Result<ReviewState, StorageError> {
        self.progress
            .get(&(deck.clone(), user.clone()))
            .and_then(|states| states.get(card))
            .cloned()
            .ok_or_else(|| StorageError::ProgressNotFound {
                deck: deck.clone(),
                card: card.clone(),
                user: user.clone(),
            })
    }

    fn put_review_state(
        &mut self,
        deck: &DeckId,
        card: &CardId,
        user: &UserId,
        state: &ReviewState,
    ) -> Result<(), StorageError> {
        self.progress
            .entry((deck.clone(), user.clone()))
            .or_default()
            .insert(card.clone(), state.clone());
        Ok(())
    }

    fn list_state_keys(
        &self,
        deck: &DeckId,
        user: &UserId,
    ) -> Result<HashSet<CardId>, StorageError> {
        Ok(self
            .progress
            .get(&(deck.clone(), user.clone()))
            .map(|states| states.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn list_due_page(
        &self,
        deck: &DeckId,
        user: &UserId,
        now: DateTime<Utc>,
        after: Option<&DueKey>,
        limit: usize,
    ) -> Result<Vec<DueEntry>, StorageError> {
        let Some(states) = self.progress.get(&(deck.clone(), user.clone())) else {
            return Ok(Vec::new());
        };
        let mut entries: Vec<DueEntry> = states
            .iter()
            .filter(|(_, state)| state.due_at <= now)
            .map(|(card_id, state)| DueEntry {
                card_id: card_id.clone(),
                state: state.clone(),
            })
            .collect();
        entries.sort_by(|a, b| {
            (a.state.due_at, &a.card_id).cmp(&(b.state.due_at, &b.card_id))
        });
        if let Some(after) = after {
            entries.retain(|entry| {
                (entry.state.due_at, &entry.card_id) > (after.due_at, &after.card_id)
            });
        }
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use memora_core::CardContent;

    fn card(id: &str) -> Card {
        Card::new(
            id,
            CardContent::FrontBack {
                front: format!("front {}", id),
                back: format!("back {}", id),
            },
        )
    }

    fn state_due_at(due_at: DateTime<Utc>) -> ReviewState {
        ReviewState {
            due_at,
            last_reviewed_at: due_at - Duration::days(1),
            ..ReviewState::seed()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()
    }

    fn deck() -> DeckId {
        DeckId::new("d1")
    }

    fn user() -> UserId {
        UserId::new("u1")
    }

    fn seeded_store(ids: &[&str]) -> InMemoryStore {
        let mut store = InMemoryStore::new();
        for id in ids {
            store.put_card(&deck(), &card(id)).unwrap();
        }
        store
    }

    #[test]
    fn get_card_roundtrip_and_not_found() {
        let store = seeded_store(&["c1"]);
        assert_eq!(store.get_card(&deck(), &CardId::new("c1")).unwrap(), card("c1"));
        assert!(matches!(
            store.get_card(&deck(), &CardId::new("missing")),
            Err(StorageError::CardNotFound { .. })
        ));
    }

    #[test]
    fn deck_pages_are_id_ordered_and_resume_after_key() {
        let store = seeded_store(&["c3", "c1", "c5", "c2", "c4"]);

        let first = store.list_deck_page(&deck(), None, 3).unwrap();
        let ids: Vec<_> = first.iter().map(|c| c.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);

        let rest = store
            .list_deck_page(&deck(), Some(&CardId::new("c3")), 3)
            .unwrap();
        let ids: Vec<_> = rest.iter().map(|c| c.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["c4", "c5"]);
    }

    #[test]
    fn unknown_deck_pages_are_empty() {
        let store = InMemoryStore::new();
        assert!(store
            .list_deck_page(&DeckId::new("nope"), None, 10)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn refs_fetch_skips_missing_and_preserves_ref_order() {
        let mut store = seeded_store(&["c1", "c2", "c3"]);
        store.delete_card(&deck(), &CardId::new("c2")).unwrap();

        let refs = vec![CardId::new("c3"), CardId::new("c2"), CardId::new("c1")];
        let cards = store.get_cards_by_refs(&deck(), &refs).unwrap();
        let ids: Vec<_> = cards.iter().map(|c| c.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["c3", "c1"]);
    }

    #[test]
    fn review_state_upsert_is_last_write_wins() {
        let mut store = InMemoryStore::new();
        let card_id = CardId::new("c1");

        assert!(matches!(
            store.get_review_state(&deck(), &card_id, &user()),
            Err(StorageError::ProgressNotFound { .. })
        ));

        let first = state_due_at(now());
        store
            .put_review_state(&deck(), &card_id, &user(), &first)
            .unwrap();
        let mut second = first.clone();
        second.reps = 7;
        store
            .put_review_state(&deck(), &card_id, &user(), &second)
            .unwrap();

        assert_eq!(
            store.get_review_state(&deck(), &card_id, &user()).unwrap(),
            second
        );
    }

    #[test]
    fn state_keys_cover_exactly_the_reviewed_cards() {
        let mut store = InMemoryStore::new();
        for id in ["c1", "c3"] {
            store
                .put_review_state(&deck(), &CardId::new(id), &user(), &state_due_at(now()))
                .unwrap();
        }
        // Another user's state must not leak into this user's key set.
        store
            .put_review_state(
                &deck(),
                &CardId::new("c9"),
                &UserId::new("u2"),
                &state_due_at(now()),
            )
            .unwrap();

        let keys = store.list_state_keys(&deck(), &user()).unwrap();
        assert_eq!(
            keys,
            HashSet::from([CardId::new("c1"), CardId::new("c3")])
        );
    }

    #[test]
    fn due_page_filters_orders_and_breaks_ties_by_card_id() {
        let mut store = InMemoryStore::new();
        let t0 = now() - Duration::days(2);
        let t1 = now() - Duration::days(1);

        // Same due_at for cb/ca to exercise the card-ID tiebreak; cz is in
        // the future and must be filtered out.
        for (id, due) in [("cb", t1), ("ca", t1), ("cc", t0), ("cz", now() + Duration::days(1))] {
            store
                .put_review_state(&deck(), &CardId::new(id), &user(), &state_due_at(due))
                .unwrap();
        }

        let entries = store.list_due_page(&deck(), &user(), now(), None, 10).unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.card_id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["cc", "ca", "cb"]);
    }

    #[test]
    fn due_page_resumes_strictly_after_key() {
        let mut store = InMemoryStore::new();
        let t1 = now() - Duration::days(1);
        for id in ["ca", "cb", "cc"] {
            store
                .put_review_state(&deck(), &CardId::new(id), &user(), &state_due_at(t1))
                .unwrap();
        }

        let first = store.list_due_page(&deck(), &user(), now(), None, 2).unwrap();
        assert_eq!(first.len(), 2);

        let rest = store
            .list_due_page(&deck(), &user(), now(), Some(&first[1].key()), 2)
            .unwrap();
        let ids: Vec<_> = rest.iter().map(|e| e.card_id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["cc"]);
    }
}
