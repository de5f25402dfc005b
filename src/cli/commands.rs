//! CLI command definitions.

use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};

use super::output::OutputFormat;
use crate::backend::BackendKind;

/// event-bench - write and read synthetic events through a cache or a
/// relational store.
#[derive(Debug, Parser)]
#[command(name = "event-bench")]
#[command(version, about)]
pub struct Cli {
    /// Storage backend to use (the cache backend speaks the Redis protocol)
    #[arg(long, short = 'b', value_enum)]
    pub backend: BackendKind,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Add an event for a user
    AddEvent {
        /// Owning user id
        #[arg(long)]
        user: i64,
        /// Event type tag (e.g. login, purchase)
        #[arg(long = "type", value_parser = NonEmptyStringValueParser::new())]
        event_type: String,
    },

    /// Read an event by id
    GetEvent {
        /// Event id
        #[arg(long)]
        id: String,
    },

    /// List events for a user (always empty on the cache backend)
    UserEvents {
        /// Owning user id
        #[arg(long)]
        user: i64,
    },

    /// Generate and insert a batch of random events
    GenerateBatch {
        /// Number of events to generate
        #[arg(long, short = 'n')]
        number: usize,
    },

    /// Remove all data from the backend
    Clear,

    /// Run the benchmark workload and report latencies
    Bench {
        /// Number of events to insert and read back
        #[arg(long, default_value_t = 1_000)]
        events: usize,
        /// Number of user-scoped queries
        #[arg(long, default_value_t = 100)]
        queries: usize,
        /// Keep existing data instead of clearing first
        #[arg(long)]
        keep_existing: bool,
        /// Seed for reproducible user and type choices
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let Ok(cli) = Cli::try_parse_from(args) else {
            panic!("failed to parse {args:?}");
        };
        cli
    }

    #[test]
    fn parses_add_event() {
        let cli = parse(&[
            "event-bench",
            "--backend",
            "cache",
            "add-event",
            "--user",
            "42",
            "--type",
            "login",
        ]);
        assert_eq!(cli.backend, BackendKind::Cache);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(
            cli.command,
            Command::AddEvent {
                user: 42,
                event_type: "login".to_string()
            }
        );
    }

    #[test]
    fn accepts_legacy_backend_names() {
        let cli = parse(&[
            "event-bench",
            "--backend",
            "singlestore",
            "get-event",
            "--id",
            "e1",
        ]);
        assert_eq!(cli.backend, BackendKind::Relational);
        let cli = parse(&["event-bench", "--backend", "memcached", "clear"]);
        assert_eq!(cli.backend, BackendKind::Cache);
    }

    #[test]
    fn parses_generate_batch_and_format() {
        let cli = parse(&[
            "event-bench",
            "-b",
            "relational",
            "-f",
            "json",
            "generate-batch",
            "--number",
            "10",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.command, Command::GenerateBatch { number: 10 });
    }

    #[test]
    fn bench_defaults() {
        let cli = parse(&["event-bench", "--backend", "cache", "bench"]);
        assert_eq!(
            cli.command,
            Command::Bench {
                events: 1_000,
                queries: 100,
                keep_existing: false,
                seed: None
            }
        );
    }

    #[test]
    fn rejects_empty_event_type() {
        let result = Cli::try_parse_from([
            "event-bench",
            "--backend",
            "cache",
            "add-event",
            "--user",
            "1",
            "--type",
            "",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn requires_backend() {
        assert!(Cli::try_parse_from(["event-bench", "clear"]).is_err());
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["event-bench", "--backend", "postgres", "clear"]).is_err());
    }
}
