//! Storage abstraction for memora decks and review progress.
//!
//! Provides the [`CardStore`] and [`ProgressStore`] traits defining the
//! storage contract that all backends implement, plus [`InMemoryStore`] and
//! [`SqliteStore`] as first-class backends.
//!
//! # Architecture
//!
//! The two traits mirror the engine's two candidate sources:
//! - [`CardStore`] serves card documents: point reads, batched reads by
//!   reference, and ID-ordered pages for the unstudied sub-feed.
//! - [`ProgressStore`] serves per-(card, user) review state: point
//!   reads/upserts, the studied-key set, and `(due_at, card_id)`-ordered
//!   pages for the due sub-feed.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: DueKey / DueEntry storage-layer types
//! - [`traits`]: CardStore and ProgressStore trait definitions
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: SQL schema constants and migration setup
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{CardStore, ProgressStore};
pub use types::{DueEntry, DueKey};
