//! # event-bench
//!
//! Benchmark harness that writes and reads synthetic events through one of
//! two interchangeable storage backends, a key-value cache and a relational
//! store, so their latency and throughput can be compared under identical
//! workloads.
//!
//! ## Architecture
//!
//! ```text
//! CLI (cli/)                 BenchRunner (bench/)
//!     │                          │
//!     └──────── EventService (service/) ────────┘
//!                     │
//!          Arc<dyn StorageBackend> (backend/)
//!                     │
//!        ├── CacheBackend       (Redis protocol)
//!        └── RelationalBackend  (MySQL protocol)
//!
//! Event, EventId, EventGenerator (domain/)
//! ```

pub mod backend;
pub mod bench;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
