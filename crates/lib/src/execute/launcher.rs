//! Process launching.
//!
//! Dispatch never spawns processes itself; it goes through a [`Launcher`] so the
//! scheduling can be exercised without a renderer installed.

use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::debug;

use super::command::RenderCommand;
use super::types::ExitOutcome;

/// Starts render commands and waits for them.
///
/// `launch` must return as soon as the process is running; `wait` resolves
/// when it has exited.
#[async_trait]
pub trait Launcher: Send + Sync {
  /// Handle of a running process.
  type Process: Send;

  fn launch(&self, command: &RenderCommand) -> io::Result<Self::Process>;

  async fn wait(&self, process: Self::Process) -> io::Result<ExitOutcome>;
}

/// Runs render commands as OS processes.
///
/// Stdin is closed; stdout and stderr are inherited so renderer diagnostics
/// reach the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

#[async_trait]
impl Launcher for ProcessLauncher {
  type Process = Child;

  fn launch(&self, command: &RenderCommand) -> io::Result<Child> {
    debug!(program = %command.program.display(), name = %command.name, kind = %command.kind, "spawning renderer");
    Command::new(&command.program)
      .args(&command.args)
      .stdin(Stdio::null())
      .spawn()
  }

  async fn wait(&self, mut process: Child) -> io::Result<ExitOutcome> {
    let status = process.wait().await?;
    Ok(ExitOutcome { code: status.code() })
  }
}
