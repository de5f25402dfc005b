//! Per-phase latency statistics.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Summary of the latencies observed for one benchmark phase.
///
/// All latencies are in microseconds. Percentiles use the nearest-rank
/// method. An empty sample set yields all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LatencyStats {
    /// Number of operations measured.
    pub count: usize,
    /// Sum of all operation latencies.
    pub total_us: f64,
    /// Arithmetic mean latency.
    pub mean_us: f64,
    /// Fastest operation.
    pub min_us: f64,
    /// Median latency.
    pub p50_us: f64,
    /// 95th percentile latency.
    pub p95_us: f64,
    /// 99th percentile latency.
    pub p99_us: f64,
    /// Slowest operation.
    pub max_us: f64,
    /// Operations per second over the summed latency.
    pub ops_per_sec: f64,
}

impl LatencyStats {
    /// Computes statistics from raw per-operation durations.
    #[must_use]
    pub fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let total: Duration = sorted.iter().sum();
        let count = sorted.len();
        let total_us = micros(total);
        let ops_per_sec = if total.is_zero() {
            0.0
        } else {
            count as f64 / total.as_secs_f64()
        };

        Self {
            count,
            total_us,
            mean_us: total_us / count as f64,
            min_us: sorted.first().map_or(0.0, |d| micros(*d)),
            p50_us: percentile(&sorted, 50.0),
            p95_us: percentile(&sorted, 95.0),
            p99_us: percentile(&sorted, 99.0),
            max_us: sorted.last().map_or(0.0, |d| micros(*d)),
            ops_per_sec,
        }
    }
}

impl fmt::Display for LatencyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>8} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>12.1}",
            self.count,
            self.mean_us,
            self.min_us,
            self.p50_us,
            self.p95_us,
            self.p99_us,
            self.max_us,
            self.ops_per_sec,
        )
    }
}

/// Nearest-rank percentile over an ascending, non-empty slice.
fn percentile(sorted: &[Duration], pct: f64) -> f64 {
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    let idx = rank.saturating_sub(1).min(sorted.len().saturating_sub(1));
    sorted.get(idx).map_or(0.0, |d| micros(*d))
}

fn micros(d: Duration) -> f64 {
    d.as_secs_f64() * 1_000_000.0
}
