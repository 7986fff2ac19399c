use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, Command};

use crate::error::RunnerError;

use super::types::RunnerStartArgs;

/// The spawned child with all three standard streams piped to us.
pub struct ChildSession {
    child: Child,
}

impl ChildSession {
    pub fn start(args: &RunnerStartArgs) -> Result<Self, RunnerError> {
        let child = Command::new(&args.cmd)
            .args(&args.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                cmd: args.cmd.clone(),
                source,
            })?;

        Ok(Self { child })
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn stdin(&mut self) -> Result<Box<dyn AsyncWrite + Unpin + Send>, RunnerError> {
        self.child
            .stdin
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncWrite + Unpin + Send>)
            .ok_or(RunnerError::Pipe("stdin"))
    }

    pub fn stdout(&mut self) -> Result<Box<dyn AsyncRead + Unpin + Send>, RunnerError> {
        self.child
            .stdout
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
            .ok_or(RunnerError::Pipe("stdout"))
    }

    pub fn stderr(&mut self) -> Result<Box<dyn AsyncRead + Unpin + Send>, RunnerError> {
        self.child
            .stderr
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
            .ok_or(RunnerError::Pipe("stderr"))
    }

    /// Kills and reaps the child. Used when setup fails after the spawn.
    pub async fn abort(&mut self) {
        if let Err(e) = self.child.kill().await {
            tracing::warn!(error.kind = "child.kill_failed", error.message = %e);
        }
    }

    pub async fn wait(&mut self) -> Result<ExitStatus, RunnerError> {
        self.child.wait().await.map_err(RunnerError::Wait)
    }
}
