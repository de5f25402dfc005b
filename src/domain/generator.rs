//! Synthetic event generation.
//!
//! [`EventGenerator`] produces the events used by the CLI and by the
//! benchmark driver. Users are drawn uniformly from `1..=max_user_id` and
//! types uniformly from the configured vocabulary.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::Event;
use crate::error::BenchError;

/// Default event type vocabulary.
pub const DEFAULT_EVENT_TYPES: [&str; 5] = ["login", "logout", "page_view", "purchase", "click"];

/// Default upper bound for synthetic user ids.
pub const DEFAULT_MAX_USER_ID: i64 = 10_000;

/// Random event factory bound to a vocabulary and a user-id range.
#[derive(Debug)]
pub struct EventGenerator {
    event_types: Vec<String>,
    max_user_id: i64,
    rng: StdRng,
}

impl EventGenerator {
    /// Creates a generator seeded from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfig`] if `event_types` is empty or
    /// `max_user_id` is less than 1.
    pub fn new(event_types: Vec<String>, max_user_id: i64) -> Result<Self, BenchError> {
        Self::with_rng(event_types, max_user_id, StdRng::from_entropy())
    }

    /// Creates a generator with a fixed seed, for reproducible workloads.
    ///
    /// Identities and timestamps are still unique per call; only the user
    /// and type choices repeat across runs.
    ///
    /// # Errors
    ///
    /// Same conditions as [`EventGenerator::new`].
    pub fn with_seed(
        event_types: Vec<String>,
        max_user_id: i64,
        seed: u64,
    ) -> Result<Self, BenchError> {
        Self::with_rng(event_types, max_user_id, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        event_types: Vec<String>,
        max_user_id: i64,
        rng: StdRng,
    ) -> Result<Self, BenchError> {
        if event_types.is_empty() {
            return Err(BenchError::InvalidConfig(
                "event type vocabulary must not be empty".to_string(),
            ));
        }
        if max_user_id < 1 {
            return Err(BenchError::InvalidConfig(format!(
                "max user id must be at least 1, got {max_user_id}"
            )));
        }
        Ok(Self {
            event_types,
            max_user_id,
            rng,
        })
    }

    /// Generates one event, filling any field not supplied with a random
    /// value.
    pub fn generate_event(&mut self, user_id: Option<i64>, event_type: Option<&str>) -> Event {
        let user_id = user_id.unwrap_or_else(|| self.rng.gen_range(1..=self.max_user_id));
        let event_type = match event_type {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => self.random_event_type(),
        };
        Event::new(user_id, event_type)
    }

    /// Generates `n` fully random events.
    pub fn generate_batch(&mut self, n: usize) -> Vec<Event> {
        (0..n).map(|_| self.generate_event(None, None)).collect()
    }

    fn random_event_type(&mut self) -> String {
        // Vocabulary is non-empty by construction.
        self.event_types
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default()
    }
}

/// Returns [`DEFAULT_EVENT_TYPES`] as owned strings.
#[must_use]
pub fn default_event_types() -> Vec<String> {
    DEFAULT_EVENT_TYPES.iter().map(|t| (*t).to_string()).collect()
}
