//! Application state with shared `StudyService` for concurrent access.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` for use
//! with axum handlers. Uses `tokio::sync::Mutex` (async-aware) instead of
//! `std::sync::Mutex` (blocking) so handlers await the lock without
//! blocking the tokio runtime.
//!
//! Note: `StudyService` contains a `rusqlite::Connection`, which is `!Sync`,
//! so it cannot sit behind an `RwLock` for concurrent reads; the async
//! `Mutex` is the correct, non-blocking alternative.

use std::sync::Arc;
use std::time::Instant;

use crate::error::ApiError;
use crate::service::StudyService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared study service (async Mutex -- non-blocking await).
    pub service: Arc<tokio::sync::Mutex<StudyService>>,
    /// Server start time, reported by the health endpoint.
    pub started_at: Instant,
}

impl AppState {
    /// Creates a new `AppState` with a `StudyService` backed by the given
    /// SQLite database path.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        let service = StudyService::new(db_path)?;
        Ok(AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
            started_at: Instant::now(),
        })
    }

    /// Creates a new `AppState` with an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        let service = StudyService::in_memory()?;
        Ok(AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
            started_at: Instant::now(),
        })
    }
}
