//! The polymorphic card model.
//!
//! A [`Card`] pairs an opaque ID with a [`CardContent`] payload. The payload
//! is a closed tagged-variant set selected by the explicit `type` field in
//! JSON -- no runtime registry. The content is flattened into the card's
//! JSON object, so the wire shape is
//! `{"id": "c1", "type": "front_back", "front": "...", "back": "..."}`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::CardId;

/// A card in a deck: an opaque ID plus a kind-tagged payload.
///
/// Cards carry no intrinsic ordering semantics beyond the natural sort of
/// their ID, which the storage layer exposes for paging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Opaque card identifier, unique within its deck.
    pub id: CardId,
    /// The kind-tagged payload.
    #[serde(flatten)]
    pub content: CardContent,
}

/// The closed set of card kinds, dispatched by the `type` JSON tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardContent {
    /// Classic two-sided card.
    FrontBack { front: String, back: String },
    /// Options mapped to whether they are correct answers.
    MultipleChoice { options: IndexMap<String, bool> },
    /// Items the student must arrange into this order.
    Ordered { options: Vec<String> },
    /// Fill-in-the-blank question with its accepted answers.
    Blanks {
        question: String,
        answers: Vec<String>,
    },
}

impl Card {
    /// Creates a new card with the given ID and payload.
    pub fn new(id: impl Into<CardId>, content: CardContent) -> Self {
        Card {
            id: id.into(),
            content,
        }
    }

    /// Returns the wire-level kind tag for this card.
    pub fn kind(&self) -> &'static str {
        self.content.kind()
    }

    /// Validates the payload. See [`CardContent::validate`].
    pub fn validate(&self) -> Result<(), CoreError> {
        self.content.validate()
    }
}

impl CardContent {
    /// Returns the wire-level kind tag.
    pub fn kind(&self) -> &'static str {
        match self {
            CardContent::FrontBack { .. } => "front_back",
            CardContent::MultipleChoice { .. } => "multiple_choice",
            CardContent::Ordered { .. } => "ordered",
            CardContent::Blanks { .. } => "blanks",
        }
    }

    /// Validates required fields per kind: no empty text fields, at least
    /// one option/answer, and at least one correct multiple-choice option.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            CardContent::FrontBack { front, back } => {
                if front.trim().is_empty() {
                    return Err(CoreError::MissingField { field: "front" });
                }
                if back.trim().is_empty() {
                    return Err(CoreError::MissingField { field: "back" });
                }
                Ok(())
            }
            CardContent::MultipleChoice { options } => {
                if options.is_empty() {
                    return Err(CoreError::EmptyEntries { what: "option" });
                }
                if !options.values().any(|correct| *correct) {
                    return Err(CoreError::NoCorrectOption);
                }
                Ok(())
            }
            CardContent::Ordered { options } => {
                if options.is_empty() {
                    return Err(CoreError::EmptyEntries { what: "option" });
                }
                Ok(())
            }
            CardContent::Blanks { question, answers } => {
                if question.trim().is_empty() {
                    return Err(CoreError::MissingField { field: "question" });
                }
                if answers.is_empty() {
                    return Err(CoreError::EmptyEntries { what: "answer" });
                }
                Ok(())
            }
        }
    }
}
