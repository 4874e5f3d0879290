//! HTTP/JSON API server for the memora study engine.
//!
//! Exposes the due-card feed, per-card review progress reads, and
//! asynchronous review recording over a REST API. This crate contains the
//! server framework, API schema types, error handling, the study service,
//! and route definitions.

pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
