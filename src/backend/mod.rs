//! Storage backends: the common contract and its implementations.
//!
//! Every backend implements [`StorageBackend`]. The backend is chosen at
//! run time through [`BackendKind`] and handed around as
//! `Arc<dyn StorageBackend>`, so callers never name a concrete type.
//!
//! ```text
//! EventService / BenchRunner
//!     │
//!     └── Arc<dyn StorageBackend>
//!             ├── CacheBackend       (Redis protocol, JSON values)
//!             └── RelationalBackend  (MySQL protocol, `events` table)
//! ```

pub mod cache;
pub mod relational;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::domain::{Event, EventId};
use crate::error::BenchError;

pub use cache::CacheBackend;
pub use relational::RelationalBackend;

/// Minimal capability set a storage medium must expose to take part in a
/// benchmark.
///
/// Each call is one round-trip to the medium and completes before it
/// returns. Thread-safety across concurrent callers is whatever the
/// underlying driver provides.
#[async_trait]
pub trait StorageBackend: Send + Sync + fmt::Debug {
    /// Human-readable name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Stores `event` under `id`, which must be the event's own id.
    ///
    /// Re-inserting an existing id is backend-defined: caches overwrite,
    /// relational stores reject it.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::ConstraintViolation`] on a rejected duplicate
    /// or when `id` differs from `event.event_id()`, or a
    /// connectivity/backend error from the driver.
    async fn insert_event(&self, id: &EventId, event: &Event) -> Result<(), BenchError>;

    /// Returns the event stored under `id`, or `None` if it is absent or
    /// expired.
    ///
    /// # Errors
    ///
    /// Returns an error only when the medium fails; a missing key is not
    /// an error.
    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, BenchError>;

    /// Returns every stored event owned by `user_id`, in no particular
    /// order.
    ///
    /// Backends without a secondary index return an empty vector, which
    /// callers cannot tell apart from "no events for this user".
    ///
    /// # Errors
    ///
    /// Returns an error when the medium fails.
    async fn query_events_by_user(&self, user_id: i64) -> Result<Vec<Event>, BenchError>;

    /// Removes all data managed by this backend.
    ///
    /// The scope is the whole medium (cache database or table), shared by
    /// every other user of it.
    ///
    /// # Errors
    ///
    /// Returns an error when the medium fails.
    async fn clear(&self) -> Result<(), BenchError>;

    /// Releases the connection. Later calls fail with
    /// [`BenchError::Connectivity`].
    async fn close(&self);
}

/// Rejects an insert whose key is not the event's own id.
///
/// Both backends store the event under `id` and hand back the event as
/// written, so the two must agree or a later lookup would return an event
/// whose id differs from the key it was found under.
///
/// # Errors
///
/// Returns [`BenchError::ConstraintViolation`] on a mismatch.
pub fn ensure_key_matches(id: &EventId, event: &Event) -> Result<(), BenchError> {
    if id == event.event_id() {
        return Ok(());
    }
    Err(BenchError::ConstraintViolation(format!(
        "key {id} does not match event id {}",
        event.event_id()
    )))
}

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum BackendKind {
    /// Key-value cache over the Redis protocol; `memcached` is accepted as
    /// a name but `CACHE_URL` must point at a Redis server.
    #[value(aliases = ["memcached", "redis"])]
    Cache,
    /// Relational store (MySQL protocol).
    #[value(aliases = ["singlestore", "mysql"])]
    Relational,
}

impl BackendKind {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Relational => "relational",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opens the backend selected by `kind` using the connection settings in
/// `config`.
///
/// # Errors
///
/// Returns [`BenchError::Connectivity`] if the medium cannot be reached,
/// or a backend error if schema bootstrap fails.
pub async fn connect(
    kind: BackendKind,
    config: &AppConfig,
) -> Result<Arc<dyn StorageBackend>, BenchError> {
    let backend: Arc<dyn StorageBackend> = match kind {
        BackendKind::Cache => Arc::new(CacheBackend::connect(&config.cache).await?),
        BackendKind::Relational => Arc::new(RelationalBackend::connect(&config.database).await?),
    };
    tracing::info!(backend = backend.name(), "backend connected");
    Ok(backend)
}
