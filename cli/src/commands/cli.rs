use clap::Parser;
use cmdlog_core::api::{
    validate_time_format, AnsiMode, DrainMode, LoggingConfig, RunConfig, DEFAULT_TIME_FORMAT,
};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainArg {
    /// Wait until the child's stdout and stderr are fully copied.
    Join,
    /// Exit as soon as the child is reaped; trailing output may be lost.
    BestEffort,
}

#[derive(Parser, Debug)]
#[command(
    name = "cmdlog",
    version,
    about = "cmdlog prints to stdout and stderr and logs to a logfile. Easy to use, easy to document.",
    override_usage = "cmdlog [OPTION...] CMD [CMD OPTION...]"
)]
pub struct Args {
    /// Remove ANSI escape sequences from the log file; the terminal still gets them.
    #[arg(long)]
    pub strip_ansi: bool,

    #[arg(long, value_enum, default_value_t = DrainArg::Join)]
    pub drain: DrainArg,

    /// chrono format string for the timestamp in front of every output line.
    #[arg(long, default_value = DEFAULT_TIME_FORMAT, value_parser = parse_time_format)]
    pub time_format: String,

    /// Diagnostic tracing on stderr (RUST_LOG takes precedence).
    #[arg(short, long)]
    pub verbose: bool,

    /// The command to run, followed by its own options.
    #[arg(
        value_name = "CMD",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

impl Args {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            time_format: self.time_format.clone(),
            ansi: if self.strip_ansi {
                AnsiMode::Strip
            } else {
                AnsiMode::Preserve
            },
            drain: match self.drain {
                DrainArg::Join => DrainMode::Join,
                DrainArg::BestEffort => DrainMode::BestEffort,
            },
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        if self.verbose {
            LoggingConfig {
                level: "debug".to_string(),
            }
        } else {
            LoggingConfig::default()
        }
    }
}

fn parse_time_format(s: &str) -> Result<String, String> {
    validate_time_format(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("cmdlog").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn everything_after_the_command_belongs_to_it() {
        let args = parse(&["ls", "-la", "--color=never", "-v"]);
        assert_eq!(args.command, vec!["ls", "-la", "--color=never", "-v"]);
        assert!(!args.verbose);
    }

    #[test]
    fn leading_double_dash_is_skipped() {
        let args = parse(&["--", "grep", "-r", "x"]);
        assert_eq!(args.command, vec!["grep", "-r", "x"]);
    }

    #[test]
    fn own_options_come_first() {
        let args = parse(&["--strip-ansi", "--drain", "best-effort", "-v", "make", "all"]);
        assert_eq!(args.command, vec!["make", "all"]);

        let cfg = args.run_config();
        assert_eq!(cfg.ansi, AnsiMode::Strip);
        assert_eq!(cfg.drain, DrainMode::BestEffort);
        assert_eq!(args.logging_config().level, "debug");
    }

    #[test]
    fn defaults_match_plain_invocation() {
        let args = parse(&["true"]);
        let cfg = args.run_config();
        assert_eq!(cfg.time_format, DEFAULT_TIME_FORMAT);
        assert_eq!(cfg.ansi, AnsiMode::Preserve);
        assert_eq!(cfg.drain, DrainMode::Join);
    }

    #[test]
    fn no_command_parses_to_empty() {
        assert!(parse(&[]).command.is_empty());
    }

    #[test]
    fn rejects_bad_time_format() {
        let res = Args::try_parse_from(["cmdlog", "--time-format", "%Q", "ls"]);
        assert!(res.is_err());
    }
}
