//! HTTP handler modules for the memora API.
//!
//! Each sub-module implements thin handlers that parse requests, acquire the
//! service lock, delegate to [`StudyService`](crate::service::StudyService),
//! and return JSON responses. No business logic lives in handlers.

pub mod health;
pub mod progress;
pub mod study;
