//! Opaque event identifier.
//!
//! [`EventId`] is a newtype over the string key both backends store events
//! under. Generated identifiers are UUID v4 values rendered as 32 lowercase
//! hex digits, but any string read back from storage is accepted as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for an event.
///
/// Generated once when the event is created and immutable thereafter.
/// Used as the cache key and as the relational primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Generates a fresh random identifier (UUID v4, simple hex form).
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
