//! Event service: the facade callers use instead of a concrete backend.

use std::sync::Arc;

use crate::backend::StorageBackend;
use crate::domain::{Event, EventId};
use crate::error::BenchError;

/// Orchestration layer for event operations.
///
/// Stateless coordinator over an injected [`StorageBackend`]. Every method
/// is a direct delegation: no retries, caching or validation happen here,
/// and every backend error reaches the caller unchanged.
#[derive(Debug, Clone)]
pub struct EventService {
    backend: Arc<dyn StorageBackend>,
}

impl EventService {
    /// Creates a new `EventService` over `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Returns a reference to the installed backend.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    /// Stores `event` under its own id.
    ///
    /// # Errors
    ///
    /// Propagates the backend's [`BenchError`].
    pub async fn add_event(&self, event: &Event) -> Result<(), BenchError> {
        self.backend.insert_event(event.event_id(), event).await?;
        tracing::debug!(event_id = %event.event_id(), user_id = event.user_id(), "event added");
        Ok(())
    }

    /// Stores every event in `events` in order, returning how many were
    /// written.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first backend error; events before it stay
    /// stored.
    pub async fn add_events(&self, events: &[Event]) -> Result<usize, BenchError> {
        for event in events {
            self.add_event(event).await?;
        }
        tracing::info!(
            backend = self.backend.name(),
            count = events.len(),
            "event batch added"
        );
        Ok(events.len())
    }

    /// Fetches one event by id; `None` if absent.
    ///
    /// # Errors
    ///
    /// Propagates the backend's [`BenchError`].
    pub async fn get_event_by_id(&self, id: &EventId) -> Result<Option<Event>, BenchError> {
        self.backend.get_event(id).await
    }

    /// Fetches all events for `user_id`, in backend order.
    ///
    /// # Errors
    ///
    /// Propagates the backend's [`BenchError`].
    pub async fn get_user_events(&self, user_id: i64) -> Result<Vec<Event>, BenchError> {
        self.backend.query_events_by_user(user_id).await
    }

    /// Removes all data from the backend.
    ///
    /// # Errors
    ///
    /// Propagates the backend's [`BenchError`].
    pub async fn clear_backend(&self) -> Result<(), BenchError> {
        self.backend.clear().await
    }
}
