//! Contract tests against live backends started in containers.
//!
//! These need a Docker daemon and are ignored by default:
//! `cargo test --test backends -- --ignored`.

use std::collections::HashSet;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use testcontainers::ContainerAsync;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mysql::Mysql;
use testcontainers_modules::redis::{REDIS_PORT, Redis};

use event_bench::backend::{CacheBackend, RelationalBackend, StorageBackend};
use event_bench::config::{CacheConfig, DatabaseConfig};
use event_bench::domain::generator::default_event_types;
use event_bench::domain::{Event, EventGenerator, EventId};
use event_bench::error::BenchError;

type TestResult = Result<(), Box<dyn Error>>;

const MYSQL_PORT: u16 = 3306;

async fn cache_backend(
    ttl: Option<Duration>,
) -> Result<(ContainerAsync<Redis>, CacheBackend), Box<dyn Error>> {
    let container = Redis::default().start().await?;
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(REDIS_PORT).await?;
    let config = CacheConfig {
        url: format!("redis://{host}:{port}"),
        ttl,
    };
    let backend = CacheBackend::connect(&config).await?;
    Ok((container, backend))
}

async fn relational_backend()
-> Result<(ContainerAsync<Mysql>, RelationalBackend), Box<dyn Error>> {
    let container = Mysql::default().start().await?;
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(MYSQL_PORT).await?;
    let config = DatabaseConfig {
        url: format!("mysql://root@{host}:{port}/test"),
        max_connections: 2,
        connect_timeout: Duration::from_secs(30),
    };
    let backend = RelationalBackend::connect(&config).await?;
    Ok((container, backend))
}

/// Round-trip, absence and clear properties shared by every backend.
async fn check_point_lookups(backend: &dyn StorageBackend) -> TestResult {
    let mut generator = EventGenerator::with_seed(default_event_types(), 100, 5)?;
    let batch = generator.generate_batch(50);

    for event in &batch {
        backend.insert_event(event.event_id(), event).await?;
    }
    for event in &batch {
        assert_eq!(backend.get_event(event.event_id()).await?.as_ref(), Some(event));
    }

    assert_eq!(backend.get_event(&EventId::generate()).await?, None);

    backend.clear().await?;
    for event in &batch {
        assert_eq!(backend.get_event(event.event_id()).await?, None);
    }
    Ok(())
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn cache_point_lookups() -> TestResult {
    let (_container, backend) = cache_backend(None).await?;
    check_point_lookups(&backend).await
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn relational_point_lookups() -> TestResult {
    let (_container, backend) = relational_backend().await?;
    check_point_lookups(&backend).await
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn cache_has_no_user_index() -> TestResult {
    let (_container, backend) = cache_backend(None).await?;
    let event = Event::from_parts("e1", 42, "login", 1000.0);
    backend.insert_event(event.event_id(), &event).await?;

    assert!(backend.query_events_by_user(42).await?.is_empty());
    Ok(())
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn cache_overwrites_duplicates() -> TestResult {
    let (_container, backend) = cache_backend(None).await?;
    let id = EventId::from("dup");
    backend.insert_event(&id, &Event::from_parts("dup", 1, "login", 1.0)).await?;
    backend.insert_event(&id, &Event::from_parts("dup", 2, "click", 2.0)).await?;

    assert_eq!(
        backend.get_event(&id).await?,
        Some(Event::from_parts("dup", 2, "click", 2.0))
    );
    Ok(())
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn cache_entries_expire_with_ttl() -> TestResult {
    let (_container, backend) = cache_backend(Some(Duration::from_secs(1))).await?;
    let event = Event::new(1, "login");
    backend.insert_event(event.event_id(), &event).await?;
    assert!(backend.get_event(event.event_id()).await?.is_some());

    tokio::time::sleep(Duration::from_millis(2_100)).await;
    assert_eq!(backend.get_event(event.event_id()).await?, None);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn relational_concrete_scenario() -> TestResult {
    let (_container, backend) = relational_backend().await?;
    let backend: Arc<dyn StorageBackend> = Arc::new(backend);

    let e1 = Event::from_parts("e1", 42, "login", 1000.0);
    let e2 = Event::from_parts("e2", 42, "click", 1001.0);

    backend.insert_event(e1.event_id(), &e1).await?;
    assert_eq!(backend.get_event(e1.event_id()).await?, Some(e1.clone()));

    backend.insert_event(e2.event_id(), &e2).await?;
    let mut found = backend.query_events_by_user(42).await?;
    found.sort_by(|a, b| a.event_id().cmp(b.event_id()));
    assert_eq!(found, vec![e1.clone(), e2]);

    backend.clear().await?;
    assert_eq!(backend.get_event(e1.event_id()).await?, None);
    assert!(backend.query_events_by_user(42).await?.is_empty());
    Ok(())
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn relational_user_query_is_exact() -> TestResult {
    let (_container, backend) = relational_backend().await?;
    let mut generator = EventGenerator::with_seed(default_event_types(), 4, 9)?;
    let batch = generator.generate_batch(120);
    for event in &batch {
        backend.insert_event(event.event_id(), event).await?;
    }

    for user in 1..=4 {
        let expected: HashSet<_> = batch
            .iter()
            .filter(|e| e.user_id() == user)
            .map(|e| e.event_id().clone())
            .collect();
        let found = backend.query_events_by_user(user).await?;
        let ids: HashSet<_> = found.iter().map(|e| e.event_id().clone()).collect();
        assert_eq!(found.len(), ids.len());
        assert_eq!(ids, expected);
    }
    Ok(())
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn relational_rejects_duplicates() -> TestResult {
    let (_container, backend) = relational_backend().await?;
    let event = Event::from_parts("dup", 1, "login", 1.0);
    backend.insert_event(event.event_id(), &event).await?;

    let result = backend.insert_event(event.event_id(), &event).await;
    assert!(matches!(result, Err(BenchError::ConstraintViolation(_))));
    Ok(())
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn relational_keys_are_case_sensitive() -> TestResult {
    let (_container, backend) = relational_backend().await?;
    let lower = Event::from_parts("e1", 42, "login", 1000.0);
    let upper = Event::from_parts("E1", 7, "click", 1001.0);

    backend.insert_event(lower.event_id(), &lower).await?;
    assert_eq!(backend.get_event(upper.event_id()).await?, None);

    backend.insert_event(upper.event_id(), &upper).await?;
    assert_eq!(backend.get_event(lower.event_id()).await?, Some(lower));
    assert_eq!(backend.get_event(upper.event_id()).await?, Some(upper));
    Ok(())
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn foreign_keys_are_rejected_by_both_backends() -> TestResult {
    let (_redis, cache) = cache_backend(None).await?;
    let (_mysql, relational) = relational_backend().await?;
    let event = Event::from_parts("e1", 42, "login", 1000.0);
    let key = EventId::from("other");

    for backend in [&cache as &dyn StorageBackend, &relational] {
        let result = backend.insert_event(&key, &event).await;
        assert!(
            matches!(result, Err(BenchError::ConstraintViolation(_))),
            "{} accepted a mismatched key",
            backend.name()
        );
        assert_eq!(backend.get_event(&key).await?, None);
    }
    Ok(())
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn relational_schema_bootstrap_is_idempotent() -> TestResult {
    let (_container, backend) = relational_backend().await?;
    backend.init_schema().await?;
    backend.init_schema().await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn closed_backends_fail_with_connectivity() -> TestResult {
    let (_redis, cache) = cache_backend(None).await?;
    let (_mysql, relational) = relational_backend().await?;

    for backend in [&cache as &dyn StorageBackend, &relational] {
        backend.close().await;
        let result = backend.get_event(&EventId::from("e1")).await;
        assert!(
            matches!(result, Err(BenchError::Connectivity(_))),
            "{} should fail after close",
            backend.name()
        );
    }
    Ok(())
}
