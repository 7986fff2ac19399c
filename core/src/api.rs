//! Stable re-exports for consumers (`cli` and external crates).
//!
//! Prefer importing from `cmdlog_core::api` instead of reaching into internal modules.

pub use crate::config::{
    AnsiMode, DrainMode, LoggingConfig, RunConfig, DEFAULT_LOGGING_LEVEL, DEFAULT_TIME_FORMAT,
};
pub use crate::error::{CliError, RunnerError, TeeError};
pub use crate::naming::{command_line, name_for, name_in, sanitize};
pub use crate::runner::{
    run, validate_time_format, RunArgs, RunOutcome, RunPhase, RunnerStartArgs, SharedSink, Sink,
    TeeLogger, TeeWriter,
};
