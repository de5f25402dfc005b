//! Key-value cache backend over the Redis protocol.
//!
//! Events are stored as JSON documents under their id:
//! `event_id -> {"event_id": .., "user_id": .., "event_type": .., "timestamp": ..}`.
//! The cache has no secondary index, so user-scoped queries always come
//! back empty, and entries may disappear on eviction or expiry.

use std::fmt;
use std::sync::RwLock;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

use super::{StorageBackend, ensure_key_matches};
use crate::config::CacheConfig;
use crate::domain::{Event, EventId};
use crate::error::BenchError;

/// Cache backend holding one multiplexed connection.
///
/// The connection is opened in [`CacheBackend::connect`] and released by
/// [`StorageBackend::close`]. Clones of the multiplexed handle share one
/// socket, so concurrent callers pipeline over the same connection.
pub struct CacheBackend {
    conn: RwLock<Option<MultiplexedConnection>>,
    config: CacheConfig,
}

impl CacheBackend {
    /// Connects to the cache at `config.url`.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfig`] for a malformed URL and
    /// [`BenchError::Connectivity`] if the server cannot be reached.
    pub async fn connect(config: &CacheConfig) -> Result<Self, BenchError> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| BenchError::InvalidConfig(format!("cache url: {e}")))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| BenchError::Connectivity(e.to_string()))?;

        tracing::debug!(url = %config.url, ttl = ?config.ttl, "cache connection opened");
        Ok(Self {
            conn: RwLock::new(Some(conn)),
            config: config.clone(),
        })
    }

    fn connection(&self) -> Result<MultiplexedConnection, BenchError> {
        let guard = self
            .conn
            .read()
            .map_err(|_| BenchError::Connectivity("cache connection lock poisoned".to_string()))?;
        guard
            .clone()
            .ok_or_else(|| BenchError::Connectivity("cache backend is closed".to_string()))
    }
}

impl fmt::Debug for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = self.conn.read().map(|c| c.is_some()).unwrap_or(false);
        f.debug_struct("CacheBackend")
            .field("url", &self.config.url)
            .field("ttl", &self.config.ttl)
            .field("open", &open)
            .finish()
    }
}

#[async_trait]
impl StorageBackend for CacheBackend {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn insert_event(&self, id: &EventId, event: &Event) -> Result<(), BenchError> {
        ensure_key_matches(id, event)?;
        let payload = event.encode()?;
        let mut conn = self.connection()?;
        match self.config.ttl {
            Some(ttl) => conn
                .set_ex::<_, _, ()>(id.as_str(), payload, ttl.as_secs().max(1))
                .await
                .map_err(cache_error)?,
            None => conn
                .set::<_, _, ()>(id.as_str(), payload)
                .await
                .map_err(cache_error)?,
        }
        Ok(())
    }

    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, BenchError> {
        let mut conn = self.connection()?;
        let payload: Option<Vec<u8>> = conn.get(id.as_str()).await.map_err(cache_error)?;
        payload.map(|bytes| Event::decode(&bytes)).transpose()
    }

    async fn query_events_by_user(&self, user_id: i64) -> Result<Vec<Event>, BenchError> {
        tracing::debug!(user_id, "cache backend has no user index; returning no events");
        Ok(Vec::new())
    }

    async fn clear(&self) -> Result<(), BenchError> {
        let mut conn = self.connection()?;
        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await
            .map_err(cache_error)?;
        tracing::info!(url = %self.config.url, "cache flushed");
        Ok(())
    }

    async fn close(&self) {
        if let Ok(mut guard) = self.conn.write() {
            if guard.take().is_some() {
                tracing::debug!(url = %self.config.url, "cache connection closed");
            }
        }
    }
}

/// Maps a driver error into the harness taxonomy.
fn cache_error(err: redis::RedisError) -> BenchError {
    if err.is_io_error()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.is_timeout()
    {
        BenchError::Connectivity(err.to_string())
    } else {
        BenchError::Backend(err.to_string())
    }
}
