//! Service layer: caller-facing orchestration.
//!
//! [`EventService`] decouples callers (CLI, benchmark driver) from the
//! choice of [`crate::backend::StorageBackend`].

pub mod event_service;

pub use event_service::EventService;
