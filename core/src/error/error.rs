use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("no command given")]
    Usage,
    #[error("{0}")]
    Runner(#[from] RunnerError),
    #[error("command failed: {0}")]
    Command(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("invalid time format: {0:?}")]
    TimeFormat(String),
    #[error("Error opening log file {}: {source}", .path.display())]
    LogOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Error writing to log file: {0}")]
    LogWrite(#[source] std::io::Error),
    #[error("Error setting up {0} pipe")]
    Pipe(&'static str),
    #[error("Error starting command {cmd}: {source}")]
    Spawn {
        cmd: String,
        source: std::io::Error,
    },
    #[error("Error waiting for command: {0}")]
    Wait(#[source] std::io::Error),
    #[error("stream io error: {stream} {source}")]
    StreamIo {
        stream: &'static str,
        source: std::io::Error,
    },
    #[error("tee failed: {0}")]
    Tee(#[from] TeeError),
}

#[derive(Error, Debug)]
pub enum TeeError {
    #[error("tee needs at least two sinks, got {0}")]
    TooFewSinks(usize),
    #[error("write to sink #{index} failed: {source}")]
    Write {
        index: usize,
        source: std::io::Error,
    },
}
