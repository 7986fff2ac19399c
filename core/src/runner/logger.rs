use std::fmt::Display;

use chrono::format::{Item, StrftimeItems};
use chrono::Local;

use crate::error::{RunnerError, TeeError};

use super::tee::{Sink, TeeWriter};

/// Checks a chrono format string up front; formatting with a bad one panics.
pub fn validate_time_format(fmt: &str) -> Result<(), RunnerError> {
    if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return Err(RunnerError::TimeFormat(fmt.to_string()));
    }
    Ok(())
}

/// Timestamp-prefixing layer over the tee. Each `line` call emits exactly one
/// `<timestamp> <text>\n` write, so messages from different tasks never mix.
pub struct TeeLogger {
    tee: TeeWriter,
    time_format: String,
}

impl TeeLogger {
    pub fn new(tee: TeeWriter, time_format: impl Into<String>) -> Result<Self, RunnerError> {
        let time_format = time_format.into();
        validate_time_format(&time_format)?;
        Ok(Self { tee, time_format })
    }

    pub fn timestamp(&self) -> String {
        Local::now().format(&self.time_format).to_string()
    }

    /// Builds the bytes of one log line. A trailing newline in `text` is not doubled.
    pub fn stamp(&self, text: &[u8]) -> Vec<u8> {
        let ts = self.timestamp();
        let mut line = Vec::with_capacity(ts.len() + text.len() + 2);
        line.extend_from_slice(ts.as_bytes());
        line.push(b' ');
        line.extend_from_slice(text);
        if line.last() != Some(&b'\n') {
            line.push(b'\n');
        }
        line
    }

    pub async fn line(&self, text: &[u8]) -> Result<(), TeeError> {
        self.tee.write(&self.stamp(text)).await
    }

    /// Passes already stamped bytes to the tee unchanged.
    pub async fn write(&self, bytes: &[u8]) -> Result<(), TeeError> {
        self.tee.write(bytes).await
    }

    /// Logs a message for the user. Failures only reach diagnostic tracing:
    /// there is nowhere else left to report them.
    pub async fn log(&self, msg: impl Display) {
        let msg = msg.to_string();
        if let Err(e) = self.line(msg.as_bytes()).await {
            tracing::warn!(error.kind = "tee.log_failed", error.message = %e, message = %msg);
        }
    }

    /// Writes a stamped line to one sink only, bypassing the tee.
    pub async fn log_to(&self, sink: &dyn Sink, msg: impl Display) {
        let msg = msg.to_string();
        if let Err(e) = sink.write_all(&self.stamp(msg.as_bytes())).await {
            tracing::warn!(error.kind = "tee.log_failed", error.message = %e, message = %msg);
        }
    }
}
