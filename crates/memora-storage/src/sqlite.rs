//! SQLite implementation of the storage contract.
//!
//! [`SqliteStore`] persists cards and review states in a SQLite database
//! with WAL mode and automatic schema migrations. Card payloads are stored
//! as JSON TEXT columns via serde_json; timestamps as INTEGER epoch
//! milliseconds so the `(due_at, card_id)` ordering matches the in-memory
//! backend exactly.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use memora_core::{Card, CardContent, CardId, DeckId, ReviewState, UserId};

use crate::error::StorageError;
use crate::traits::{CardStore, ProgressStore};
use crate::types::{DueEntry, DueKey};

/// SQLite-backed implementation of [`CardStore`] and [`ProgressStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Reconstructs a [`ReviewState`] from its column values.
    fn state_from_columns(
        ease_factor: i32,
        interval_days: f64,
        reps: u32,
        lapses: u32,
        due_at_ms: i64,
        last_reviewed_ms: i64,
    ) -> Result<ReviewState, StorageError> {
        let due_at = millis_to_datetime(due_at_ms)?;
        let last_reviewed_at = millis_to_datetime(last_reviewed_ms)?;
        Ok(ReviewState {
            ease_factor,
            interval: interval_days,
            reps,
            lapses,
            due_at,
            last_reviewed_at,
        })
    }
}

fn millis_to_datetime(ms: i64) -> Result<DateTime<Utc>, StorageError> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| StorageError::IntegrityError {
        reason: format!("timestamp out of range: {}ms", ms),
    })
}

impl CardStore for SqliteStore {
    fn put_card(&mut self, deck: &DeckId, card: &Card) -> Result<(), StorageError> {
        let payload = serde_json::to_string(&card.content)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO cards (deck_id, card_id, payload) VALUES (?1, ?2, ?3)",
            params![deck.as_str(), card.id.as_str(), payload],
        )?;
        Ok(())
    }

    fn get_card(&self, deck: &DeckId, card: &CardId) -> Result<Card, StorageError> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM cards WHERE deck_id = ?1 AND card_id = ?2",
                params![deck.as_str(), card.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(payload) = payload else {
            return Err(StorageError::CardNotFound {
                deck: deck.clone(),
                card: card.clone(),
            });
        };
        let content: CardContent = serde_json::from_str(&payload)?;
        Ok(Card {
            id: card.clone(),
            content,
        })
    }

    fn delete_card(&mut self, deck: &DeckId, card: &CardId) -> Result<(), StorageError> {
        let deleted = self.conn.execute(
            "DELETE FROM cards WHERE deck_id = ?1 AND card_id = ?2",
            params![deck.as_str(), card.as_str()],
        )?;
        if deleted == 0 {
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
        let mut stmt = self.conn.prepare_cached(
            "SELECT card_id, payload FROM cards
             WHERE deck_id = ?1 AND card_id > ?2
             ORDER BY card_id
             LIMIT ?3",
        )?;
        // Card IDs are non-empty, so the empty string sorts before every ID
        // and serves as the from-the-start resume key.
        let after_id = after.map_or("", |card| card.as_str());
        let rows = stmt.query_map(params![deck.as_str(), after_id, limit as i64], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut cards = Vec::new();
        for row in rows {
            let (card_id, payload) = row?;
            let content: CardContent = serde_json::from_str(&payload)?;
            cards.push(Card {
                id: CardId::new(card_id),
                content,
            });
        }
        Ok(cards)
    }

    fn get_cards_by_refs(
        &self,
        deck: &DeckId,
        refs: &[CardId],
    ) -> Result<Vec<Card>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT payload FROM cards WHERE deck_id = ?1 AND card_id = ?2",
        )?;
        let mut cards = Vec::with_capacity(refs.len());
        for card_id in refs {
            let payload: Option<String> = stmt
                .query_row(params![deck.as_str(), card_id.as_str()], |row| row.get(0))
                .optional()?;
            // Missing references are skipped, not errors: a card deleted
            // after its review state was written must not fail the batch.
            let Some(payload) = payload else { continue };
            let content: CardContent = serde_json::from_str(&payload)?;
            cards.push(Card {
                id: card_id.clone(),
                content,
            });
        }
        Ok(cards)
    }
}

impl ProgressStore for SqliteStore {
    fn get_review_state(
        &self,
        deck: &DeckId,
        card: &CardId,
        user: &UserId,
    ) -> Result<ReviewState, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT ease_factor, interval_days, reps, lapses, due_at_ms, last_reviewed_ms
                 FROM review_states
                 WHERE deck_id = ?1 AND card_id = ?2 AND user_id = ?3",
                params![deck.as_str(), card.as_str(), user.as_str()],
                |row| {
                    Ok((
                        row.get::<_, i32>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, u32>(2)?,
                        row.get::<_, u32>(3)?,
                        row.get::<_, i64>(4)?,
                        row.get::<_, i64>(5)?,
                    ))
                },
            )
            .optional()?;
        let Some((ease_factor, interval_days, reps, lapses, due_at_ms, last_reviewed_ms)) = row
        else {
            return Err(StorageError::ProgressNotFound {
                deck: deck.clone(),
                card: card.clone(),
                user: user.clone(),
            });
        };
        Self::state_from_columns(
            ease_factor,
            interval_days,
            reps,
            lapses,
            due_at_ms,
            last_reviewed_ms,
        )
    }

    fn put_review_state(
        &mut self,
        deck: &DeckId,
        card: &CardId,
        user: &UserId,
        state: &ReviewState,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO review_states
             (deck_id, card_id, user_id, ease_factor, interval_days, reps, lapses, due_at_ms, last_reviewed_ms)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                deck.as_str(),
                card.as_str(),
                user.as_str(),
                state.ease_factor,
                state.interval,
                state.reps,
                state.lapses,
                state.due_at.timestamp_millis(),
                state.last_reviewed_at.timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    fn list_state_keys(
        &self,
        deck: &DeckId,
        user: &UserId,
    ) -> Result<HashSet<CardId>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT card_id FROM review_states WHERE deck_id = ?1 AND user_id = ?2",
        )?;
        let rows = stmt.query_map(params![deck.as_str(), user.as_str()], |row| {
            row.get::<_, String>(0)
        })?;
        let mut keys = HashSet::new();
        for row in rows {
            keys.insert(CardId::new(row?));
        }
        Ok(keys)
    }

    fn list_due_page(
        &self,
        deck: &DeckId,
        user: &UserId,
        now: DateTime<Utc>,
        after: Option<&DueKey>,
        limit: usize,
    ) -> Result<Vec<DueEntry>, StorageError> {
        type Row = (String, i32, f64, u32, u32, i64, i64);
        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<Row> {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
            ))
        };

        let now_ms = now.timestamp_millis();
        let raw: Vec<rusqlite::Result<Row>> = match after {
            None => {
                let mut stmt = self.conn.prepare_cached(
                    "SELECT card_id, ease_factor, interval_days, reps, lapses, due_at_ms, last_reviewed_ms
                     FROM review_states
                     WHERE deck_id = ?1 AND user_id = ?2 AND due_at_ms <= ?3
                     ORDER BY due_at_ms, card_id
                     LIMIT ?4",
                )?;
                let rows = stmt.query_map(
                    params![deck.as_str(), user.as_str(), now_ms, limit as i64],
                    map_row,
                )?;
                rows.collect()
            }
            Some(after) => {
                let mut stmt = self.conn.prepare_cached(
                    "SELECT card_id, ease_factor, interval_days, reps, lapses, due_at_ms, last_reviewed_ms
                     FROM review_states
                     WHERE deck_id = ?1 AND user_id = ?2 AND due_at_ms <= ?3
                       AND (due_at_ms > ?4 OR (due_at_ms = ?4 AND card_id > ?5))
                     ORDER BY due_at_ms, card_id
                     LIMIT ?6",
                )?;
                let rows = stmt.query_map(
                    params![
                        deck.as_str(),
                        user.as_str(),
                        now_ms,
                        after.due_at.timestamp_millis(),
                        after.card_id.as_str(),
                        limit as i64,
                    ],
                    map_row,
                )?;
                rows.collect()
            }
        };

        let mut entries = Vec::new();
        for row in raw {
            let (card_id, ease_factor, interval_days, reps, lapses, due_at_ms, last_reviewed_ms) =
                row?;
            entries.push(DueEntry {
                card_id: CardId::new(card_id),
                state: Self::state_from_columns(
                    ease_factor,
                    interval_days,
                    reps,
                    lapses,
                    due_at_ms,
                    last_reviewed_ms,
                )?,
            });
        }
        Ok(entries)
    }
}
