//! Benchmark driver: identical workloads, comparable numbers.
//!
//! [`BenchRunner`] pushes one [`Workload`] through an
//! [`crate::service::EventService`] and times every backend call.
//! Results come back as a [`BenchReport`] with one [`LatencyStats`] per
//! phase.

pub mod runner;
pub mod stats;

pub use runner::{BenchReport, BenchRunner, Workload};
pub use stats::LatencyStats;
