//! Single-artifact rendering.
//!
//! Unlike [`dispatch`](super::dispatch::dispatch), a single render reports a
//! failing renderer as an error.

use std::path::PathBuf;

use tracing::info;

use super::command::RenderCommand;
use super::launcher::Launcher;
use super::types::ExecuteError;

/// Run one render command and wait for it.
///
/// Returns the artifact path on success.
///
/// # Errors
///
/// - `Launch` if the renderer cannot be started
/// - `Wait` if waiting for it fails
/// - `RenderFailed` if it exits with a non-zero code or is killed by a signal
pub async fn render_one<L: Launcher>(command: &RenderCommand, launcher: &L) -> Result<PathBuf, ExecuteError> {
  info!(name = %command.name, kind = %command.kind, "rendering");

  let process = launcher.launch(command).map_err(|source| ExecuteError::Launch {
    program: command.program.clone(),
    source,
  })?;

  let outcome = launcher.wait(process).await.map_err(|source| ExecuteError::Wait {
    name: command.name.clone(),
    kind: command.kind,
    source,
  })?;

  if !outcome.success() {
    return Err(ExecuteError::RenderFailed {
      name: command.name.clone(),
      kind: command.kind,
      code: outcome.code,
    });
  }

  Ok(command.output.clone())
}
