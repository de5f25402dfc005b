//! Domain layer: the event model and its synthetic generator.
//!
//! This module contains the value types every backend stores: the
//! [`Event`] record, its [`EventId`], and the [`EventGenerator`] that
//! produces synthetic workloads.

pub mod event;
pub mod event_id;
pub mod generator;

pub use event::Event;
pub use event_id::EventId;
pub use generator::EventGenerator;
