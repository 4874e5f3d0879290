//! Liveness endpoint response type.

use serde::Serialize;

/// Response for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always "ok" when the server answers at all.
    pub status: String,
    /// Seconds since the server started.
    pub uptime_seconds: u64,
}
