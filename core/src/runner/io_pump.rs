use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::task::JoinHandle;

use crate::error::RunnerError;

use super::logger::TeeLogger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStream {
    Stdout,
    Stderr,
}

impl LineStream {
    pub fn label(self) -> &'static str {
        match self {
            LineStream::Stdout => "stdout",
            LineStream::Stderr => "stderr",
        }
    }
}

pub fn pump_stdout<R>(rd: R, logger: Arc<TeeLogger>) -> JoinHandle<Result<u64, RunnerError>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    pump(rd, logger, LineStream::Stdout)
}

pub fn pump_stderr<R>(rd: R, logger: Arc<TeeLogger>) -> JoinHandle<Result<u64, RunnerError>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    pump(rd, logger, LineStream::Stderr)
}

/// Copies a child stream into the tee logger as it arrives, one tee write
/// per read. Returns the number of bytes read.
///
/// Nothing is held back waiting for a newline, so prompts show up at once.
/// A read error or a failed tee write is reported once through the logger
/// and ends this pump only; the child and the other tasks keep running.
fn pump<R>(
    mut rd: R,
    logger: Arc<TeeLogger>,
    stream: LineStream,
) -> JoinHandle<Result<u64, RunnerError>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let label = stream.label();
        let mut buf = vec![0u8; 16 * 1024];
        let mut total = 0u64;
        let mut stamper = LineStamper::default();

        loop {
            let n = match rd.read(&mut buf).await {
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(
                        error.kind = "pump.read_failed",
                        stream = label,
                        error.message = %e
                    );
                    logger.log(format!("Error reading {label}: {e}")).await;
                    return Err(RunnerError::StreamIo {
                        stream: label,
                        source: e,
                    });
                }
            };
            if n == 0 {
                break;
            }
            total += n as u64;

            let out = stamper.stamp(&logger.timestamp(), &buf[..n]);
            emit(&logger, &out, label).await?;
        }

        // Close an unterminated last line so later log lines start clean.
        if !stamper.at_line_start {
            emit(&logger, b"\n", label).await?;
        }

        tracing::debug!(stream = label, bytes = total, "pump finished");
        Ok(total)
    })
}

async fn emit(logger: &TeeLogger, bytes: &[u8], label: &'static str) -> Result<(), RunnerError> {
    if let Err(e) = logger.write(bytes).await {
        tracing::warn!(error.kind = "pump.write_failed", stream = label, error.message = %e);
        logger
            .log(format!("Error copying {label} to log: {e}"))
            .await;
        return Err(e.into());
    }
    Ok(())
}

/// Puts a timestamp in front of every line start. A line continued over
/// several reads is stamped once.
struct LineStamper {
    at_line_start: bool,
}

impl Default for LineStamper {
    fn default() -> Self {
        Self {
            at_line_start: true,
        }
    }
}

impl LineStamper {
    fn stamp(&mut self, ts: &str, chunk: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(chunk.len() + ts.len() + 1);
        for piece in chunk.split_inclusive(|&b| b == b'\n') {
            if self.at_line_start {
                out.extend_from_slice(ts.as_bytes());
                out.push(b' ');
            }
            out.extend_from_slice(piece);
            self.at_line_start = piece.last() == Some(&b'\n');
        }
        out
    }
}
