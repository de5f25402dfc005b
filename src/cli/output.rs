//! Output formatting for CLI results.

use serde::Serialize;
use serde_json::json;

use crate::bench::BenchReport;
use crate::domain::Event;
use crate::error::BenchError;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Renders the result of `add-event`.
///
/// # Errors
///
/// Returns [`BenchError::Serialization`] if JSON rendering fails.
pub fn added(event: &Event, format: OutputFormat) -> Result<String, BenchError> {
    match format {
        OutputFormat::Text => Ok(format!("Event added: {}", event.event_id())),
        OutputFormat::Json => to_json(event),
    }
}

/// Renders the result of `get-event`.
///
/// # Errors
///
/// Returns [`BenchError::Serialization`] if JSON rendering fails.
pub fn event(event: Option<&Event>, format: OutputFormat) -> Result<String, BenchError> {
    match (format, event) {
        (OutputFormat::Text, Some(e)) => Ok(event_line(e)),
        (OutputFormat::Text, None) => Ok("Event not found".to_string()),
        (OutputFormat::Json, e) => to_json(&e),
    }
}

/// Renders the result of `user-events`.
///
/// # Errors
///
/// Returns [`BenchError::Serialization`] if JSON rendering fails.
pub fn events(events: &[Event], format: OutputFormat) -> Result<String, BenchError> {
    match format {
        OutputFormat::Text => {
            let mut lines = vec![format!("{} events found", events.len())];
            lines.extend(events.iter().map(event_line));
            Ok(lines.join("\n"))
        }
        OutputFormat::Json => to_json(&events),
    }
}

/// Renders the result of `generate-batch`.
///
/// # Errors
///
/// Returns [`BenchError::Serialization`] if JSON rendering fails.
pub fn generated(count: usize, format: OutputFormat) -> Result<String, BenchError> {
    match format {
        OutputFormat::Text => Ok(format!("Generated {count} events")),
        OutputFormat::Json => to_json(&json!({ "generated": count })),
    }
}

/// Renders the result of `clear`.
///
/// # Errors
///
/// Returns [`BenchError::Serialization`] if JSON rendering fails.
pub fn cleared(backend: &str, format: OutputFormat) -> Result<String, BenchError> {
    match format {
        OutputFormat::Text => Ok(format!("Backend {backend} cleared")),
        OutputFormat::Json => to_json(&json!({ "cleared": backend })),
    }
}

/// Renders a benchmark report.
///
/// # Errors
///
/// Returns [`BenchError::Serialization`] if JSON rendering fails.
pub fn report(report: &BenchReport, format: OutputFormat) -> Result<String, BenchError> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => to_json(report),
    }
}

fn event_line(event: &Event) -> String {
    format!(
        "{}  user={}  type={}  ts={:.6}",
        event.event_id(),
        event.user_id(),
        event.event_type(),
        event.timestamp()
    )
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, BenchError> {
    Ok(serde_json::to_string_pretty(value)?)
}
