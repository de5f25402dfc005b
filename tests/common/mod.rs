//! Shared test fixtures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use event_bench::backend::{StorageBackend, ensure_key_matches};
use event_bench::domain::{Event, EventId};
use event_bench::error::BenchError;
use event_bench::service::EventService;

/// In-memory backend with relational semantics: duplicate ids are
/// rejected and user-scoped queries are answered.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    events: Mutex<HashMap<EventId, Event>>,
    closed: Mutex<bool>,
}

impl InMemoryBackend {
    fn check_open(&self) -> Result<(), BenchError> {
        match self.closed.lock() {
            Ok(closed) if !*closed => Ok(()),
            _ => Err(BenchError::Connectivity("in-memory backend is closed".to_string())),
        }
    }

    fn with_events<T>(
        &self,
        f: impl FnOnce(&mut HashMap<EventId, Event>) -> Result<T, BenchError>,
    ) -> Result<T, BenchError> {
        self.check_open()?;
        let mut events = self
            .events
            .lock()
            .map_err(|_| BenchError::Backend("lock poisoned".to_string()))?;
        f(&mut events)
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert_event(&self, id: &EventId, event: &Event) -> Result<(), BenchError> {
        ensure_key_matches(id, event)?;
        self.with_events(|events| {
            if events.contains_key(id) {
                return Err(BenchError::ConstraintViolation(format!("duplicate id {id}")));
            }
            events.insert(id.clone(), event.clone());
            Ok(())
        })
    }

    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, BenchError> {
        self.with_events(|events| Ok(events.get(id).cloned()))
    }

    async fn query_events_by_user(&self, user_id: i64) -> Result<Vec<Event>, BenchError> {
        self.with_events(|events| {
            Ok(events
                .values()
                .filter(|e| e.user_id() == user_id)
                .cloned()
                .collect())
        })
    }

    async fn clear(&self) -> Result<(), BenchError> {
        self.with_events(|events| {
            events.clear();
            Ok(())
        })
    }

    async fn close(&self) {
        if let Ok(mut closed) = self.closed.lock() {
            *closed = true;
        }
    }
}

/// Returns a service over a fresh in-memory backend.
pub fn memory_service() -> EventService {
    EventService::new(Arc::new(InMemoryBackend::default()))
}
