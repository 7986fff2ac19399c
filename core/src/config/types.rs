/// Timestamp prefix used on every line the tee logger emits.
pub const DEFAULT_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

pub const DEFAULT_LOGGING_LEVEL: &str = "warn";

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// chrono format string for the timestamp prefix.
    pub time_format: String,

    pub ansi: AnsiMode,

    pub drain: DrainMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            ansi: AnsiMode::default(),
            drain: DrainMode::default(),
        }
    }
}

/// What happens to ANSI escape sequences on their way into the log file.
/// The terminal always receives the child's bytes untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnsiMode {
    #[default]
    Preserve,
    Strip,
}

/// Whether the supervisor waits for the stdout/stderr pumps after reaping the child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrainMode {
    /// Join both output pumps so trailing output always reaches the log.
    #[default]
    Join,
    /// Return as soon as the child is reaped; pumps finish on their own or not at all.
    BestEffort,
}

/// Diagnostic tracing on stderr. Never touches the command log.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// EnvFilter string, e.g. "warn" or "cmdlog_core=debug".
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOGGING_LEVEL.to_string(),
        }
    }
}
