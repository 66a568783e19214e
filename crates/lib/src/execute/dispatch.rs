//! Bounded parallel dispatch of render commands.
//!
//! Concurrency comes only from the renderer processes; the loop driving them
//! is sequential. There are no timeouts, so a hung renderer stalls dispatch.

use std::io::Write;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

use super::command::RenderCommand;
use super::launcher::Launcher;
use super::types::{DispatchReport, DispatchStrategy, ExecuteError, ExitOutcome, LaunchFailure};

/// Run `commands` with at most `concurrency` processes alive at once.
///
/// Exit codes are not inspected: a failed render is logged at debug level and
/// leaves its artifact missing. A command that cannot be launched is recorded
/// in the report and does not affect the others. Returns once every launched
/// process has terminated.
///
/// # Errors
///
/// `InvalidConcurrency` if `concurrency` is zero.
pub async fn dispatch<L: Launcher>(
  commands: &[RenderCommand],
  launcher: &L,
  concurrency: usize,
  strategy: DispatchStrategy,
  progress: bool,
) -> Result<DispatchReport, ExecuteError> {
  if concurrency == 0 {
    return Err(ExecuteError::InvalidConcurrency(concurrency));
  }
  if commands.is_empty() {
    return Ok(DispatchReport::default());
  }

  info!(jobs = commands.len(), concurrency, ?strategy, "dispatching renders");
  let report = match strategy {
    DispatchStrategy::Chunked => dispatch_chunked(commands, launcher, concurrency, progress).await,
    DispatchStrategy::Pool => dispatch_pool(commands, launcher, concurrency, progress).await,
  };
  info!(
    launched = report.launched,
    launch_failures = report.launch_failures.len(),
    "dispatch finished"
  );
  Ok(report)
}

/// Launch a whole chunk, then wait for every process in it before the next chunk.
async fn dispatch_chunked<L: Launcher>(
  commands: &[RenderCommand],
  launcher: &L,
  concurrency: usize,
  progress: bool,
) -> DispatchReport {
  let mut report = DispatchReport::default();

  for (index, chunk) in commands.chunks(concurrency).enumerate() {
    debug!(chunk = index, size = chunk.len(), "launching chunk");

    let mut running = Vec::with_capacity(chunk.len());
    for command in chunk {
      match launcher.launch(command) {
        Ok(process) => {
          tick(progress);
          running.push((command, process));
        }
        Err(e) => report.launch_failures.push(launch_failed(command, e)),
      }
    }

    for (command, process) in running {
      let outcome = launcher.wait(process).await;
      log_exit(command, outcome);
      report.launched += 1;
    }
  }

  report
}

/// Keep up to `concurrency` processes running, starting the next as soon as one exits.
async fn dispatch_pool<L: Launcher>(
  commands: &[RenderCommand],
  launcher: &L,
  concurrency: usize,
  progress: bool,
) -> DispatchReport {
  let mut report = DispatchReport::default();
  let mut pending = commands.iter();
  let mut running = FuturesUnordered::new();

  loop {
    while running.len() < concurrency {
      let Some(command) = pending.next() else {
        break;
      };
      match launcher.launch(command) {
        Ok(process) => {
          tick(progress);
          running.push(async move { (command, launcher.wait(process).await) });
        }
        Err(e) => report.launch_failures.push(launch_failed(command, e)),
      }
    }

    let Some((command, outcome)) = running.next().await else {
      break;
    };
    log_exit(command, outcome);
    report.launched += 1;
  }

  report
}

fn tick(progress: bool) {
  if progress {
    let mut stderr = std::io::stderr();
    let _ = stderr.write_all(b".");
    let _ = stderr.flush();
  }
}

fn launch_failed(command: &RenderCommand, error: std::io::Error) -> LaunchFailure {
  warn!(
    name = %command.name,
    kind = %command.kind,
    program = %command.program.display(),
    error = %error,
    "failed to launch renderer"
  );
  LaunchFailure {
    name: command.name.clone(),
    kind: command.kind,
    message: error.to_string(),
  }
}

fn log_exit(command: &RenderCommand, outcome: std::io::Result<ExitOutcome>) {
  match outcome {
    Ok(outcome) if outcome.success() => debug!(name = %command.name, kind = %command.kind, "render finished"),
    Ok(outcome) => debug!(name = %command.name, kind = %command.kind, code = ?outcome.code, "render exited with failure"),
    Err(e) => warn!(name = %command.name, kind = %command.kind, error = %e, "failed to wait for renderer"),
  }
}
