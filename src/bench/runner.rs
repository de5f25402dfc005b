//! Benchmark driver running one workload against one backend.

use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

use super::LatencyStats;
use crate::domain::EventGenerator;
use crate::error::BenchError;
use crate::service::EventService;

/// Shape of a benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workload {
    /// Number of synthetic events to insert and read back.
    pub events: usize,
    /// Number of user-scoped queries to issue.
    pub user_queries: usize,
    /// Clear the backend before inserting.
    pub clear_first: bool,
}

impl Default for Workload {
    fn default() -> Self {
        Self {
            events: 1_000,
            user_queries: 100,
            clear_first: true,
        }
    }
}

/// Results of one benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    /// Backend name as reported by the backend itself.
    pub backend: String,
    /// Number of events inserted.
    pub events: usize,
    /// Insert latencies.
    pub insert: LatencyStats,
    /// Point-lookup latencies.
    pub get: LatencyStats,
    /// Point lookups that found their event.
    pub get_hits: usize,
    /// Point lookups that found nothing (evicted or expired entries).
    pub get_misses: usize,
    /// User-scoped query latencies.
    pub query_by_user: LatencyStats,
    /// Events returned across all user-scoped queries.
    pub query_rows: usize,
    /// Wall-clock time for the whole run, in milliseconds.
    pub elapsed_ms: f64,
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "backend: {}  events: {}  elapsed: {:.1} ms",
            self.backend, self.events, self.elapsed_ms
        )?;
        writeln!(
            f,
            "{:<14} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>12}",
            "phase", "ops", "mean_us", "min_us", "p50_us", "p95_us", "p99_us", "max_us", "ops/sec"
        )?;
        writeln!(f, "{:<14} {}", "insert", self.insert)?;
        writeln!(f, "{:<14} {}", "get", self.get)?;
        writeln!(f, "{:<14} {}", "query_by_user", self.query_by_user)?;
        write!(
            f,
            "get hits: {}  get misses: {}  rows from user queries: {}",
            self.get_hits, self.get_misses, self.query_rows
        )
    }
}

/// Runs identical workloads against whichever backend the service wraps.
#[derive(Debug)]
pub struct BenchRunner {
    service: EventService,
    generator: EventGenerator,
}

impl BenchRunner {
    /// Creates a runner over `service`, drawing events from `generator`.
    #[must_use]
    pub fn new(service: EventService, generator: EventGenerator) -> Self {
        Self { service, generator }
    }

    /// Executes `workload` and returns per-phase statistics.
    ///
    /// Phases: optional clear, insert every generated event, read every
    /// event back by id, then issue user-scoped queries for users present
    /// in the batch. Event generation is not timed.
    ///
    /// # Errors
    ///
    /// Returns the first backend error; the run is aborted.
    pub async fn run(&mut self, workload: &Workload) -> Result<BenchReport, BenchError> {
        let backend = self.service.backend().name().to_string();
        tracing::info!(
            backend = %backend,
            events = workload.events,
            user_queries = workload.user_queries,
            "benchmark started"
        );
        let started = Instant::now();

        if workload.clear_first {
            self.service.clear_backend().await?;
        }

        let events = self.generator.generate_batch(workload.events);

        let mut insert_samples = Vec::with_capacity(events.len());
        for event in &events {
            let t = Instant::now();
            self.service.add_event(event).await?;
            insert_samples.push(t.elapsed());
        }

        let mut get_samples = Vec::with_capacity(events.len());
        let mut get_hits = 0;
        for event in &events {
            let t = Instant::now();
            let found = self.service.get_event_by_id(event.event_id()).await?;
            get_samples.push(t.elapsed());
            if found.is_some() {
                get_hits += 1;
            }
        }

        let users = query_users(
            events.iter().map(|e| e.user_id()),
            workload.user_queries,
        );
        let mut query_samples = Vec::with_capacity(users.len());
        let mut query_rows = 0;
        for user_id in users {
            let t = Instant::now();
            let found = self.service.get_user_events(user_id).await?;
            query_samples.push(t.elapsed());
            query_rows += found.len();
        }

        let report = BenchReport {
            backend,
            events: events.len(),
            insert: LatencyStats::from_samples(&insert_samples),
            get: LatencyStats::from_samples(&get_samples),
            get_hits,
            get_misses: events.len() - get_hits,
            query_by_user: LatencyStats::from_samples(&query_samples),
            query_rows,
            elapsed_ms: millis(started.elapsed()),
        };

        tracing::info!(
            backend = %report.backend,
            elapsed_ms = report.elapsed_ms,
            get_misses = report.get_misses,
            "benchmark finished"
        );
        Ok(report)
    }
}

/// Picks `count` user ids to query: distinct users in first-seen order,
/// cycled if the batch has fewer distinct users than requested. Falls
/// back to `1..=count` when the batch is empty.
fn query_users(users: impl Iterator<Item = i64>, count: usize) -> Vec<i64> {
    let mut seen = HashSet::new();
    let distinct: Vec<i64> = users.filter(|u| seen.insert(*u)).collect();

    if distinct.is_empty() {
        return (1..).take(count).collect();
    }
    distinct.iter().copied().cycle().take(count).collect()
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_users_dedupes_in_first_seen_order() {
        let users = query_users([3, 1, 3, 2, 1].into_iter(), 3);
        assert_eq!(users, vec![3, 1, 2]);
    }

    #[test]
    fn query_users_cycles_when_short() {
        let users = query_users([7, 8].into_iter(), 5);
        assert_eq!(users, vec![7, 8, 7, 8, 7]);
    }

    #[test]
    fn query_users_falls_back_for_empty_batch() {
        let users = query_users(std::iter::empty(), 3);
        assert_eq!(users, vec![1, 2, 3]);
    }

    #[test]
    fn query_users_zero_requested() {
        assert!(query_users([1, 2].into_iter(), 0).is_empty());
    }

    #[test]
    fn report_renders_every_phase() {
        let report = BenchReport {
            backend: "cache".to_string(),
            events: 2,
            insert: LatencyStats::default(),
            get: LatencyStats::default(),
            get_hits: 2,
            get_misses: 0,
            query_by_user: LatencyStats::default(),
            query_rows: 0,
            elapsed_ms: 1.5,
        };
        let text = report.to_string();
        assert!(text.contains("backend: cache"));
        assert!(text.contains("insert"));
        assert!(text.contains("query_by_user"));
        assert!(text.contains("get misses: 0"));
    }
}
