//! Review progress request types.
//!
//! The progress read returns [`memora_core::ReviewState`] directly; only
//! the review-recording request needs a wrapper here.

use memora_core::Rating;
use serde::Deserialize;

/// Body of a review-recording request: `{"rating": "good"}`.
///
/// Deserializing the [`Rating`] enum is the validation -- an unknown rating
/// string is rejected at the extractor, before any storage access.
#[derive(Debug, Clone, Deserialize)]
pub struct RatingRequest {
    pub rating: Rating,
}
