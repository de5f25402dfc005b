//! The event record written to and read from every backend.
//!
//! An [`Event`] is an immutable value object. Both backends store the same
//! four fields: the cache as a JSON document under the event's id, the
//! relational store as one row of the `events` table.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::EventId;
use crate::error::BenchError;

/// A single recorded occurrence: identity, owning user, type tag and
/// creation time.
///
/// Fields are private so an event cannot be changed after creation;
/// updates are modeled as new events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    event_id: EventId,
    user_id: i64,
    event_type: String,
    /// Seconds since the Unix epoch.
    timestamp: f64,
}

impl Event {
    /// Creates a new event with a fresh id and the current time.
    #[must_use]
    pub fn new(user_id: i64, event_type: impl Into<String>) -> Self {
        Self {
            event_id: EventId::generate(),
            user_id,
            event_type: event_type.into(),
            timestamp: now_epoch_secs(),
        }
    }

    /// Rebuilds an event from already-known field values, e.g. a stored row.
    #[must_use]
    pub fn from_parts(
        event_id: impl Into<EventId>,
        user_id: i64,
        event_type: impl Into<String>,
        timestamp: f64,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            user_id,
            event_type: event_type.into(),
            timestamp,
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn event_id(&self) -> &EventId {
        &self.event_id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Returns the type tag (e.g. `"login"`).
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Returns the creation time in seconds since the Unix epoch.
    #[must_use]
    pub const fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Encodes the event as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Serialization`] if encoding fails.
    pub fn encode(&self) -> Result<String, BenchError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes an event from a JSON document produced by [`Event::encode`].
    ///
    /// Unknown fields are ignored; missing fields are an error.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Serialization`] if the payload is not a valid
    /// encoded event.
    pub fn decode(payload: &[u8]) -> Result<Self, BenchError> {
        Ok(serde_json::from_slice(payload)?)
    }
}

/// Current wall-clock time as fractional seconds since the Unix epoch.
fn now_epoch_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
