//! Command-line interface: argument parsing and command dispatch.
//!
//! The CLI only formats and displays; every error from the service layer
//! is returned to `main` unchanged.

pub mod commands;
pub mod output;

pub use commands::{Cli, Command};
pub use output::OutputFormat;

use crate::bench::{BenchRunner, Workload};
use crate::config::AppConfig;
use crate::domain::{EventGenerator, EventId};
use crate::error::BenchError;
use crate::service::EventService;

/// Runs `command` against `service` and returns the rendered output.
///
/// # Errors
///
/// Returns the first [`BenchError`] raised by the generator, the service,
/// or output rendering.
pub async fn execute(
    command: &Command,
    format: OutputFormat,
    config: &AppConfig,
    service: &EventService,
) -> Result<String, BenchError> {
    match command {
        Command::AddEvent { user, event_type } => {
            let mut generator = generator(config, None)?;
            let event = generator.generate_event(Some(*user), Some(event_type.as_str()));
            service.add_event(&event).await?;
            tracing::info!(event_id = %event.event_id(), user_id = *user, "event added");
            output::added(&event, format)
        }
        Command::GetEvent { id } => {
            let found = service.get_event_by_id(&EventId::from(id.as_str())).await?;
            output::event(found.as_ref(), format)
        }
        Command::UserEvents { user } => {
            let found = service.get_user_events(*user).await?;
            output::events(&found, format)
        }
        Command::GenerateBatch { number } => {
            let mut generator = generator(config, None)?;
            let batch = generator.generate_batch(*number);
            let count = service.add_events(&batch).await?;
            output::generated(count, format)
        }
        Command::Clear => {
            service.clear_backend().await?;
            output::cleared(service.backend().name(), format)
        }
        Command::Bench {
            events,
            queries,
            keep_existing,
            seed,
        } => {
            let workload = Workload {
                events: *events,
                user_queries: *queries,
                clear_first: !keep_existing,
            };
            let mut runner = BenchRunner::new(service.clone(), generator(config, *seed)?);
            let report = runner.run(&workload).await?;
            output::report(&report, format)
        }
    }
}

fn generator(config: &AppConfig, seed: Option<u64>) -> Result<EventGenerator, BenchError> {
    let types = config.event_types.clone();
    match seed {
        Some(seed) => EventGenerator::with_seed(types, config.max_user_id, seed),
        None => EventGenerator::new(types, config.max_user_id),
    }
}
