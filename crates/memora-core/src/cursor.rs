//! The opaque study-feed pagination cursor.
//!
//! [`StudyCursor`] is a tagged union identifying which sub-feed the previous
//! page ended in plus a resume key within that sub-feed. It is serialized to
//! a prefixed string (`unstudied_<card-id>` or `due_<rfc3339>_<card-id>`)
//! that clients round-trip verbatim; it is never persisted server-side.
//!
//! The RFC 3339 timestamp contains no underscore, so a single `split_once`
//! recovers the card ID exactly even when card IDs contain underscores.

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use crate::id::CardId;

const UNSTUDIED_PREFIX: &str = "unstudied_";
const DUE_PREFIX: &str = "due_";

/// Resume position within the two-sub-feed study feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyCursor {
    /// First page: no resume position.
    Start,
    /// Resume the unstudied sub-feed after this card ID.
    Unstudied { last_card: CardId },
    /// Resume the due sub-feed strictly after this `(due_at, card_id)` key.
    Due {
        last_due_at: DateTime<Utc>,
        last_card: CardId,
    },
}

/// Errors from decoding a client-supplied cursor string.
///
/// These are client errors (the server did not originate the value), mapped
/// to a 400 at the HTTP boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    /// The cursor starts with no recognized sub-feed tag.
    #[error("unrecognized cursor tag: '{0}'")]
    UnknownTag(String),

    /// A recognized tag with a missing or empty resume key.
    #[error("malformed cursor payload: '{0}'")]
    MalformedPayload(String),

    /// The due-cursor timestamp failed to parse as RFC 3339.
    #[error("invalid cursor timestamp: '{0}'")]
    InvalidTimestamp(String),
}

impl StudyCursor {
    /// Encodes the cursor to its opaque string form. `Start` encodes to the
    /// empty string.
    pub fn encode(&self) -> String {
        match self {
            StudyCursor::Start => String::new(),
            StudyCursor::Unstudied { last_card } => {
                format!("{}{}", UNSTUDIED_PREFIX, last_card)
            }
            StudyCursor::Due {
                last_due_at,
                last_card,
            } => format!(
                "{}{}_{}",
                DUE_PREFIX,
                last_due_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                last_card
            ),
        }
    }

    /// Decodes an opaque cursor string. The empty string is the first page.
    pub fn decode(raw: &str) -> Result<StudyCursor, CursorError> {
        if raw.is_empty() {
            return Ok(StudyCursor::Start);
        }

        if let Some(card) = raw.strip_prefix(UNSTUDIED_PREFIX) {
            if card.is_empty() {
                return Err(CursorError::MalformedPayload(raw.to_string()));
            }
            return Ok(StudyCursor::Unstudied {
                last_card: CardId::new(card),
            });
        }

        if let Some(rest) = raw.strip_prefix(DUE_PREFIX) {
            let (timestamp, card) = rest
                .split_once('_')
                .ok_or_else(|| CursorError::MalformedPayload(raw.to_string()))?;
            if card.is_empty() {
                return Err(CursorError::MalformedPayload(raw.to_string()));
            }
            let last_due_at = DateTime::parse_from_rfc3339(timestamp)
                .map_err(|_| CursorError::InvalidTimestamp(timestamp.to_string()))?
                .with_timezone(&Utc);
            return Ok(StudyCursor::Due {
                last_due_at,
                last_card: CardId::new(card),
            });
        }

        Err(CursorError::UnknownTag(raw.to_string()))
    }
}
