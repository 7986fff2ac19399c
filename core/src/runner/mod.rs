mod input;
mod io_pump;
mod logger;
mod run;
mod session;
mod tee;
pub mod types;

pub use input::{spawn_input_forwarder, InputEnd};
pub use io_pump::{pump_stderr, pump_stdout, LineStream};
pub use logger::{validate_time_format, TeeLogger};
pub use run::{run, RunArgs};
pub use session::ChildSession;
pub use tee::{tee_log_branch, SharedSink, Sink, StripAnsi, TeeWriter};
pub use types::{RunOutcome, RunPhase, RunnerStartArgs};
