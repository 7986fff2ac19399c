use std::sync::Arc;

use cmdlog_core::api::{name_for, run, CliError, RunArgs, RunnerStartArgs, SharedSink, Sink};

use crate::commands::cli::Args;

/// Baked in at build time; shown in the usage banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn usage(version: &str) -> String {
    format!(
        "Usage: cmdlog [OPTION...] CMD [CMD OPTION...]\n\
         cmdlog prints to stdout and stderr and logs to a logfile. Easy to use,\n\
         easy to document.\n\
         \n\
         cmdlog v{version}\n"
    )
}

pub async fn run_app(args: Args) -> Result<i32, CliError> {
    let config = args.run_config();

    let mut command = args.command.into_iter();
    let cmd = command.next().ok_or(CliError::Usage)?;
    let cmd_args: Vec<String> = command.collect();

    let log_path = name_for(&cmd, &cmd_args);
    tracing::debug!(log = %log_path.display(), "log file chosen");

    let terminal: Arc<dyn Sink> = Arc::new(SharedSink::new(tokio::io::stdout()));
    let outcome = run(RunArgs {
        start: RunnerStartArgs {
            cmd,
            args: cmd_args,
        },
        log_path,
        config: &config,
        terminal,
        input: tokio::io::stdin(),
    })
    .await?;

    tracing::info!(
        log = %outcome.log_path.display(),
        exit_code = ?outcome.exit_code(),
        success = outcome.success(),
        "run finished"
    );

    // The child's status is reported in the log, not through ours.
    Ok(0)
}
