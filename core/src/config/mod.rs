mod types;

pub use types::{
    AnsiMode, DrainMode, LoggingConfig, RunConfig, DEFAULT_LOGGING_LEVEL, DEFAULT_TIME_FORMAT,
};
