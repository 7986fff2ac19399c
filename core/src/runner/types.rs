use std::path::PathBuf;
use std::process::ExitStatus;

#[derive(Debug, Clone)]
pub struct RunnerStartArgs {
    pub cmd: String,
    pub args: Vec<String>,
}

/// Lifecycle of one supervised run. States are only ever left forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    LogOpened,
    ChildStarting,
    ChildRunning,
    ChildExited,
    Done,
    FatalAborted,
}

impl RunPhase {
    pub fn can_advance_to(self, next: RunPhase) -> bool {
        use RunPhase::*;
        matches!(
            (self, next),
            (Idle, LogOpened)
                | (LogOpened, ChildStarting)
                | (ChildStarting, ChildRunning)
                | (ChildRunning, ChildExited)
                | (ChildExited, Done)
                | (Idle | LogOpened | ChildStarting, FatalAborted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunPhase::Done | RunPhase::FatalAborted)
    }
}

#[derive(Debug)]
pub struct RunOutcome {
    pub log_path: PathBuf,
    /// `None` when waiting on the child failed.
    pub status: Option<ExitStatus>,
    /// Bytes copied from the child's stdout and stderr. `None` for a pump
    /// that was not joined or did not finish cleanly.
    pub stdout_bytes: Option<u64>,
    pub stderr_bytes: Option<u64>,
}

impl RunOutcome {
    /// The child's exit code, if it exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        self.status.and_then(|s| s.code())
    }

    pub fn success(&self) -> bool {
        self.status.map(|s| s.success()).unwrap_or(false)
    }
}
