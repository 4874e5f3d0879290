//! Identifier newtypes for decks, cards, and users.
//!
//! All IDs are distinct newtype wrappers over `String` (document IDs are
//! opaque), providing type safety so that a `CardId` cannot be accidentally
//! used where a `DeckId` is expected. `CardId` carries `Ord` because the
//! unstudied sub-feed pages through cards in the ID's natural sort order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque deck identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckId(pub String);

/// Opaque card identifier. Ordered by the natural sort of its string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

/// Opaque user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl DeckId {
    pub fn new(id: impl Into<String>) -> Self {
        DeckId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        CardId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        CardId::new(id)
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        CardId::new(id)
    }
}

// Display implementations -- just print the inner value.

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_id_orders_by_natural_string_sort() {
        let mut ids = vec![CardId::new("c3"), CardId::new("c1"), CardId::new("c2")];
        ids.sort();
        assert_eq!(
            ids,
            vec![CardId::new("c1"), CardId::new("c2"), CardId::new("c3")]
        );
    }

    #[test]
    fn id_display() {
        assert_eq!(format!("{}", DeckId::new("d1")), "d1");
        assert_eq!(format!("{}", CardId::new("c7")), "c7");
        assert_eq!(format!("{}", UserId::new("u42")), "u42");
    }

    #[test]
    fn serde_is_transparent() {
        let id = CardId::new("c1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"c1\"");

        let back: CardId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn id_types_are_distinct() {
        // Same inner value, different types; confusion is a compile error.
        let deck = DeckId::new("x");
        let card = CardId::new("x");
        let user = UserId::new("x");
        assert_eq!(deck.as_str(), card.as_str());
        assert_eq!(card.as_str(), user.as_str());
    }
}
