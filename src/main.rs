//! event-bench entry point.
//!
//! Parses the command line, opens the selected backend, runs one command
//! and prints its result to standard output. Logs go to standard error.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use event_bench::backend;
use event_bench::cli::{self, Cli};
use event_bench::config::{AppConfig, LogFormat};
use event_bench::error::BenchError;
use event_bench::service::EventService;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("error[{}]: {e}", e.error_code());
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_format);

    match run(&cli, &config).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<BenchError>() {
                Some(cause) => {
                    if cause.is_connectivity() {
                        tracing::warn!(
                            backend = %cli.backend,
                            "backend unreachable; check CACHE_URL or DATABASE_URL"
                        );
                    }
                    println!("error[{}]: {e:#}", cause.error_code());
                }
                None => println!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<String> {
    let backend = backend::connect(cli.backend, config)
        .await
        .with_context(|| format!("failed to open {} backend", cli.backend))?;
    let service = EventService::new(backend);

    let result = cli::execute(&cli.command, cli.format, config, &service).await;

    service.backend().close().await;
    Ok(result?)
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
