use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;

use super::logger::TeeLogger;
use super::tee::Sink;

/// Why the input forwarder stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEnd {
    /// Our own stdin reached end of file.
    Eof,
    ReadFailed,
    LogWriteFailed,
    ChildWriteFailed,
}

/// Reads lines from `input`, echoes each verbatim (no timestamp) into the
/// log and forwards it to the child's stdin.
///
/// Any failure is logged and ends forwarding for the rest of the run. The
/// child's stdin is closed when the task ends so the child sees EOF.
pub fn spawn_input_forwarder<R>(
    input: R,
    log: Arc<dyn Sink>,
    child_stdin: Box<dyn AsyncWrite + Unpin + Send>,
    logger: Arc<TeeLogger>,
) -> JoinHandle<InputEnd>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut channel = InputChannel::new(child_stdin);
    tokio::spawn(async move {
        let mut reader = BufReader::new(input);
        let mut buf = Vec::with_capacity(1024);

        let end = loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break InputEnd::Eof,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error.kind = "input.read_failed", error.message = %e);
                    logger.log(format!("Error reading from stdin: {e}")).await;
                    break InputEnd::ReadFailed;
                }
            }

            let line = terminated_line(&buf);

            if let Err(e) = log.write_all(&line).await {
                tracing::warn!(error.kind = "input.log_write_failed", error.message = %e);
                logger.log(format!("Error writing to log file: {e}")).await;
                break InputEnd::LogWriteFailed;
            }

            if let Err(e) = channel.send(&line).await {
                tracing::warn!(error.kind = "input.stdin_broken", error.message = %e);
                logger.log(format!("Error writing to stdin: {e}")).await;
                break InputEnd::ChildWriteFailed;
            }
        };

        channel.close().await;
        tracing::debug!(end = ?end, "input forwarder finished");
        end
    })
}

// Normalizes a raw line to exactly one trailing '\n', dropping a '\r' before it.
fn terminated_line(raw: &[u8]) -> Vec<u8> {
    let mut line = raw.strip_suffix(b"\n").unwrap_or(raw);
    line = line.strip_suffix(b"\r").unwrap_or(line);
    let mut out = Vec::with_capacity(line.len() + 1);
    out.extend_from_slice(line);
    out.push(b'\n');
    out
}

struct InputChannel {
    stdin: Box<dyn AsyncWrite + Unpin + Send>,
}

impl InputChannel {
    fn new(stdin: Box<dyn AsyncWrite + Unpin + Send>) -> Self {
        Self { stdin }
    }

    async fn send(&mut self, line: &[u8]) -> std::io::Result<()> {
        self.stdin.write_all(line).await?;
        self.stdin.flush().await
    }

    async fn close(mut self) {
        let _ = self.stdin.shutdown().await;
    }
}
