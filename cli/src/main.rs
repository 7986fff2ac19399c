use std::io::Write;

use clap::Parser;
mod app;
mod commands;
use cmdlog_core::api::{CliError, LoggingConfig, RunnerError};
use commands::cli;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(CliError::Usage) => {
            print!("{}", app::usage(app::VERSION));
            let _ = std::io::stdout().flush();
            exit_code_for_error(&CliError::Usage)
        }
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    // Exit from inside the runtime: the stdin reader may still be blocked.
    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    init_tracing(&args.logging_config()).map_err(CliError::Command)?;

    app::run_app(args).await
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: child started and reaped, whatever its own status
    // 1: no command given, bad time format
    // 20: log file / child start / IO error
    // 50: internal/uncategorized
    match e {
        CliError::Usage => 1,
        CliError::Runner(re) => match re {
            RunnerError::TimeFormat(_) => 1,
            RunnerError::LogOpen { .. } => 20,
            RunnerError::LogWrite(_) => 20,
            RunnerError::Pipe(_) => 20,
            RunnerError::Spawn { .. } => 20,
            RunnerError::Wait(_) => 20,
            RunnerError::StreamIo { .. } => 20,
            RunnerError::Tee(_) => 50,
        },
        CliError::Io(_) => 20,
        CliError::Command(_) => 50,
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init()
        .map_err(|e| e.to_string())
}
