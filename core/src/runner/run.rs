use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncRead;
use tokio::task::JoinHandle;

use crate::config::{DrainMode, RunConfig};
use crate::error::RunnerError;
use crate::naming::command_line;

use super::input;
use super::io_pump;
use super::logger::{validate_time_format, TeeLogger};
use super::session::ChildSession;
use super::tee::{tee_log_branch, SharedSink, Sink, TeeWriter};
use super::types::{RunOutcome, RunPhase, RunnerStartArgs};

pub struct RunArgs<'a, I> {
    pub start: RunnerStartArgs,
    pub log_path: PathBuf,
    pub config: &'a RunConfig,
    /// Where the user sees process output. The CLI passes its own stdout.
    pub terminal: Arc<dyn Sink>,
    /// Interactive input to echo into the log and forward to the child.
    pub input: I,
}

/// Runs one command under supervision and returns once it has been reaped.
///
/// Errors are returned only for the fatal startup conditions: a bad time
/// format, opening the log, writing its header, setting up pipes and spawning. Everything that
/// goes wrong afterwards is logged and the run carries on.
pub async fn run<I>(args: RunArgs<'_, I>) -> Result<RunOutcome, RunnerError>
where
    I: AsyncRead + Unpin + Send + 'static,
{
    let RunArgs {
        start,
        log_path,
        config,
        terminal,
        input,
    } = args;
    let mut phase = RunPhase::Idle;

    validate_time_format(&config.time_format).map_err(|e| abort(&mut phase, e))?;

    let file = open_log(&log_path)
        .await
        .map_err(|e| abort(&mut phase, e))?;
    enter(&mut phase, RunPhase::LogOpened);

    let log: Arc<dyn Sink> = Arc::new(SharedSink::new(file));
    let header = format!("{}\n\n", command_line(&start.cmd, &start.args));
    log.write_all(header.as_bytes())
        .await
        .map_err(|e| abort(&mut phase, RunnerError::LogWrite(e)))?;

    let tee = TeeWriter::new(vec![terminal, tee_log_branch(log.clone(), config.ansi)])
        .map_err(|e| abort(&mut phase, e.into()))?;
    let logger = Arc::new(
        TeeLogger::new(tee, config.time_format.clone()).map_err(|e| abort(&mut phase, e))?,
    );

    enter(&mut phase, RunPhase::ChildStarting);
    let mut session = match ChildSession::start(&start) {
        Ok(session) => session,
        Err(e) => {
            logger.log_to(&*log, &e).await;
            return Err(abort(&mut phase, e));
        }
    };

    let pipes = (session.stdin(), session.stdout(), session.stderr());
    let (stdin, stdout, stderr) = match pipes {
        (Ok(stdin), Ok(stdout), Ok(stderr)) => (stdin, stdout, stderr),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
            session.abort().await;
            logger.log_to(&*log, &e).await;
            return Err(abort(&mut phase, e));
        }
    };
    enter(&mut phase, RunPhase::ChildRunning);
    tracing::debug!(
        pid = ?session.id(),
        cmd = %start.cmd,
        log = %log_path.display(),
        "child started"
    );

    let out_task = io_pump::pump_stdout(stdout, logger.clone());
    let err_task = io_pump::pump_stderr(stderr, logger.clone());
    // Never joined: it may sit in a read on a terminal nobody types into.
    let _input_task = input::spawn_input_forwarder(input, log.clone(), stdin, logger.clone());

    let waited = session.wait().await;
    enter(&mut phase, RunPhase::ChildExited);

    let (stdout_bytes, stderr_bytes) = match config.drain {
        DrainMode::Join => (
            join_pump(out_task, "stdout").await,
            join_pump(err_task, "stderr").await,
        ),
        DrainMode::BestEffort => (None, None),
    };

    let status = match waited {
        Ok(status) => {
            if !status.success() {
                logger
                    .log(format!("Command finished with error: {status}"))
                    .await;
            }
            Some(status)
        }
        Err(e) => {
            logger.log(format!("Command finished with error: {e}")).await;
            None
        }
    };
    enter(&mut phase, RunPhase::Done);

    Ok(RunOutcome {
        log_path,
        status,
        stdout_bytes,
        stderr_bytes,
    })
}

async fn open_log(path: &Path) -> Result<File, RunnerError> {
    let mut opts = OpenOptions::new();
    opts.create(true).append(true);
    #[cfg(unix)]
    opts.mode(0o644);

    opts.open(path).await.map_err(|source| RunnerError::LogOpen {
        path: path.to_path_buf(),
        source,
    })
}

async fn join_pump(
    task: JoinHandle<Result<u64, RunnerError>>,
    label: &'static str,
) -> Option<u64> {
    match task.await {
        Ok(Ok(n)) => Some(n),
        Ok(Err(e)) => {
            tracing::debug!(stream = label, error.message = %e, "pump ended early");
            None
        }
        Err(e) => {
            tracing::warn!(error.kind = "pump.join_failed", stream = label, error.message = %e);
            None
        }
    }
}

fn enter(phase: &mut RunPhase, next: RunPhase) {
    debug_assert!(phase.can_advance_to(next), "{phase:?} -> {next:?}");
    tracing::debug!(from = ?*phase, to = ?next, "run phase");
    *phase = next;
}

fn abort(phase: &mut RunPhase, e: RunnerError) -> RunnerError {
    enter(phase, RunPhase::FatalAborted);
    tracing::debug!(error.message = %e, "run aborted");
    e
}
