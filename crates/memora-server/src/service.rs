//! StudyService: the single coordinator between HTTP handlers and the
//! core/storage crates.
//!
//! All business logic flows through [`StudyService`]. Handlers are thin
//! wrappers that delegate to these methods. The service owns the feed
//! planner that merges the unstudied and due sub-feeds into one
//! cursor-paginated page.

use chrono::{DateTime, Utc};

use memora_core::{next_review_state, Card, CardId, DeckId, Rating, ReviewState, StudyCursor, UserId};
use memora_storage::{CardStore, DueKey, ProgressStore, SqliteStore};

use crate::error::ApiError;
use crate::schema::study::DueFeedPageResponse;

/// The central service coordinating review recording, progress reads, and
/// the due-card feed.
pub struct StudyService {
    /// SQLite storage backend for cards and review states.
    store: SqliteStore,
}

impl StudyService {
    /// Creates a new StudyService, opening a SQLite database at `db_path`.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        let store = SqliteStore::new(db_path)
            .map_err(|e| ApiError::InternalError(format!("failed to open store: {}", e)))?;
        Ok(StudyService { store })
    }

    /// Creates a new StudyService backed by an in-memory database (for
    /// testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        let store = SqliteStore::in_memory()
            .map_err(|e| ApiError::InternalError(format!("failed to open store: {}", e)))?;
        Ok(StudyService { store })
    }

    /// Returns mutable access to the underlying store (used by tests and
    /// seeding tools; the HTTP surface has no card CRUD).
    pub fn store_mut(&mut self) -> &mut SqliteStore {
        &mut self.store
    }

    /// Reads the review state for one (deck, card, user) triple.
    ///
    /// A card the user has never reviewed is a 404 here -- unlike review
    /// recording, where the missing state is the seed signal.
    pub fn get_review_state(
        &self,
        deck: &DeckId,
        card: &CardId,
        user: &UserId,
    ) -> Result<ReviewState, ApiError> {
        Ok(self.store.get_review_state(deck, card, user)?)
    }

    /// Applies one review: fetches the current state (or the seed, on the
    /// first review), runs the scheduler, and persists the result.
    ///
    /// Concurrent reviews of the same card race last-write-wins; there is
    /// no optimistic locking.
    pub fn record_review(
        &mut self,
        deck: &DeckId,
        card: &CardId,
        user: &UserId,
        rating: Rating,
    ) -> Result<ReviewState, ApiError> {
        let current = match self.store.get_review_state(deck, card, user) {
            Ok(state) => state,
            Err(err) if err.is_not_found() => ReviewState::seed(),
            Err(err) => return Err(err.into()),
        };
        let next = next_review_state(&current, rating, Utc::now());
        self.store.put_review_state(deck, card, user, &next)?;
        Ok(next)
    }

    /// Produces one page of cards to study.
    ///
    /// Unstudied cards always come before due cards: the page drains the
    /// unstudied sub-feed first, and only once that sub-feed is exhausted
    /// for the current horizon does the due sub-feed contribute. The two
    /// sub-feeds are read with independent, non-transactional queries; a
    /// card becoming due between them within one page fetch is tolerated.
    pub fn due_feed_page(
        &self,
        deck: &DeckId,
        user: &UserId,
        page_size: usize,
        cursor: &str,
    ) -> Result<DueFeedPageResponse, ApiError> {
        if page_size < 1 {
            return Err(ApiError::BadRequest(
                "page size must be at least 1".to_string(),
            ));
        }
        let cursor = StudyCursor::decode(cursor)?;
        let now = Utc::now();

        let after = match &cursor {
            StudyCursor::Due {
                last_due_at,
                last_card,
            } => {
                // The previous page ended inside the due sub-feed; the
                // unstudied sub-feed was already exhausted.
                let key = DueKey {
                    due_at: *last_due_at,
                    card_id: last_card.clone(),
                };
                return self.fill_from_due(deck, user, now, Some(&key), page_size, Vec::new());
            }
            StudyCursor::Unstudied { last_card } => Some(last_card),
            StudyCursor::Start => None,
        };

        // Unstudied sub-feed: over-fetch by one so "more pages exist" is
        // detectable without a second round trip, then filter against the
        // full studied-key set.
        let studied = self.store.list_state_keys(deck, user)?;
        let raw = self.store.list_deck_page(deck, after, page_size + 1)?;

        let mut cards: Vec<Card> = Vec::new();
        let mut scanned = 0usize;
        let mut last_scanned: Option<CardId> = None;
        for card in &raw {
            if cards.len() == page_size {
                break;
            }
            scanned += 1;
            last_scanned = Some(card.id.clone());
            if studied.contains(&card.id) {
                continue;
            }
            cards.push(card.clone());
        }

        // Consuming more raw cards than page_size -- kept plus skipped --
        // signals more unstudied cards likely remain, as does breaking out
        // with raw cards unscanned. Either way the due sub-feed is not
        // consulted on this page (the page may come back short).
        if scanned < raw.len() || scanned > page_size {
            let next_cursor = match last_scanned {
                Some(last_card) => StudyCursor::Unstudied { last_card }.encode(),
                None => String::new(),
            };
            return Ok(DueFeedPageResponse {
                cards,
                next_cursor,
                has_more: true,
            });
        }

        // Unstudied sub-feed exhausted for this horizon.
        let capacity = page_size - cards.len();
        if capacity == 0 {
            // Exactly filled. Peek one due entry purely to decide has_more;
            // the cursor stays in the unstudied sub-feed so the next request
            // falls through to the due sub-feed from its start.
            let has_more = !self.store.list_due_page(deck, user, now, None, 1)?.is_empty();
            let next_cursor = match (has_more, cards.last()) {
                (true, Some(last)) => StudyCursor::Unstudied {
                    last_card: last.id.clone(),
                }
                .encode(),
                _ => String::new(),
            };
            return Ok(DueFeedPageResponse {
                cards,
                next_cursor,
                has_more,
            });
        }

        self.fill_from_due(deck, user, now, None, capacity, cards)
    }

    /// Fills the remaining page capacity from the due sub-feed and finishes
    /// the response.
    fn fill_from_due(
        &self,
        deck: &DeckId,
        user: &UserId,
        now: DateTime<Utc>,
        after: Option<&DueKey>,
        capacity: usize,
        mut cards: Vec<Card>,
    ) -> Result<DueFeedPageResponse, ApiError> {
        let mut entries = self
            .store
            .list_due_page(deck, user, now, after, capacity + 1)?;
        let has_more = entries.len() > capacity;
        entries.truncate(capacity);

        // The cursor advances to the last matched state entry, not the last
        // fetched card: a trailing deleted card must still move the resume
        // key forward.
        let next_cursor = match (has_more, entries.last()) {
            (true, Some(last)) => StudyCursor::Due {
                last_due_at: last.state.due_at,
                last_card: last.card_id.clone(),
            }
            .encode(),
            _ => String::new(),
        };

        let refs: Vec<CardId> = entries.iter().map(|entry| entry.card_id.clone()).collect();
        cards.extend(self.store.get_cards_by_refs(deck, &refs)?);

        Ok(DueFeedPageResponse {
            cards,
            next_cursor,
            has_more,
        })
    }
}
