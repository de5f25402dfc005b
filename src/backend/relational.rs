//! Relational backend over the MySQL protocol (MySQL, SingleStore).
//!
//! Events live in a single table:
//!
//! ```sql
//! events(event_id PK, user_id BIGINT (indexed), event_type, event_ts DOUBLE)
//! ```
//!
//! `event_id` uses a binary collation so keys compare byte for byte, the
//! same way the cache treats them.
//!
//! Every statement runs on its own with autocommit; no transaction spans
//! more than one call.

use async_trait::async_trait;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

use super::{StorageBackend, ensure_key_matches};
use crate::config::DatabaseConfig;
use crate::domain::{Event, EventId};
use crate::error::BenchError;

/// Idempotent schema bootstrap issued on construction.
const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS events (\
     event_id VARCHAR(64) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL PRIMARY KEY, \
     user_id BIGINT NOT NULL, \
     event_type VARCHAR(64) NOT NULL, \
     event_ts DOUBLE NOT NULL, \
     KEY idx_events_user_id (user_id))";

const INSERT_EVENT: &str =
    "INSERT INTO events (event_id, user_id, event_type, event_ts) VALUES (?, ?, ?, ?)";

const SELECT_BY_ID: &str =
    "SELECT event_id, user_id, event_type, event_ts FROM events WHERE event_id = ?";

const SELECT_BY_USER: &str =
    "SELECT event_id, user_id, event_type, event_ts FROM events WHERE user_id = ?";

const DELETE_ALL: &str = "DELETE FROM events";

/// Column tuple in the fixed order (event_id, user_id, event_type, event_ts).
type EventRow = (String, i64, String, f64);

/// MySQL-backed storage using `sqlx::MySqlPool`.
#[derive(Debug, Clone)]
pub struct RelationalBackend {
    pool: MySqlPool,
}

impl RelationalBackend {
    /// Connects to `config.url` and makes sure the `events` table exists.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Connectivity`] if the server cannot be
    /// reached, or another variant if the schema cannot be created.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, BenchError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(config.connect_timeout)
            .connect(&config.url)
            .await
            .map_err(|e| match e {
                sqlx::Error::Configuration(_) => BenchError::InvalidConfig(e.to_string()),
                other => BenchError::Connectivity(other.to_string()),
            })?;

        let backend = Self::new(pool);
        backend.init_schema().await?;
        tracing::debug!(max_connections = config.max_connections, "relational pool opened");
        Ok(backend)
    }

    /// Wraps an existing connection pool without touching the schema.
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates the `events` table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns a mapped driver error if the statement fails.
    pub async fn init_schema(&self) -> Result<(), BenchError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for RelationalBackend {
    fn name(&self) -> &'static str {
        "relational"
    }

    async fn insert_event(&self, id: &EventId, event: &Event) -> Result<(), BenchError> {
        ensure_key_matches(id, event)?;
        sqlx::query(INSERT_EVENT)
            .bind(id.as_str())
            .bind(event.user_id())
            .bind(event.event_type())
            .bind(event.timestamp())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, BenchError> {
        let row = sqlx::query_as::<_, EventRow>(SELECT_BY_ID)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.map(row_to_event))
    }

    async fn query_events_by_user(&self, user_id: i64) -> Result<Vec<Event>, BenchError> {
        let rows = sqlx::query_as::<_, EventRow>(SELECT_BY_USER)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(row_to_event).collect())
    }

    async fn clear(&self) -> Result<(), BenchError> {
        let result = sqlx::query(DELETE_ALL)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        tracing::info!(rows = result.rows_affected(), "events table cleared");
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("relational pool closed");
    }
}

fn row_to_event((event_id, user_id, event_type, event_ts): EventRow) -> Event {
    Event::from_parts(event_id, user_id, event_type, event_ts)
}

/// Maps a driver error into the harness taxonomy.
fn db_error(err: sqlx::Error) -> BenchError {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            BenchError::ConstraintViolation(db.message().to_string())
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => BenchError::Connectivity(err.to_string()),
        sqlx::Error::Configuration(_) => BenchError::InvalidConfig(err.to_string()),
        other => BenchError::Backend(other.to_string()),
    }
}
