//! Test utilities for scadsets-lib.
//!
//! [`RecordingLauncher`] stands in for the renderer so dispatch can be observed
//! without spawning processes. [`fake_renderer`] writes a shell script that
//! accepts the renderer command line, for tests that do spawn processes.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::execute::{ExitOutcome, Launcher, RenderCommand};

/// A launcher that records what it was asked to do.
///
/// Every launch and exit is appended to an event log as `launch <name>` or
/// `exit <name>`. A process is "running" from `launch` until its `wait`
/// completes.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
  delay: Duration,
  failing: HashSet<String>,
  unlaunchable: HashSet<String>,
  write_outputs: bool,
  in_flight: AtomicUsize,
  max_in_flight: AtomicUsize,
  events: Mutex<Vec<String>>,
}

/// Handle returned by [`RecordingLauncher::launch`].
#[derive(Debug)]
pub struct RecordedProcess {
  name: String,
  output: PathBuf,
}

impl RecordingLauncher {
  pub fn new() -> Self {
    Self::default()
  }

  /// Each process runs for `delay` before exiting.
  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = delay;
    self
  }

  /// Processes for `name` exit with code 1 and write nothing.
  pub fn failing(mut self, name: &str) -> Self {
    self.failing.insert(name.to_string());
    self
  }

  /// Launching `name` fails.
  pub fn unlaunchable(mut self, name: &str) -> Self {
    self.unlaunchable.insert(name.to_string());
    self
  }

  /// Successful processes create their output file.
  pub fn writing_outputs(mut self) -> Self {
    self.write_outputs = true;
    self
  }

  pub fn max_in_flight(&self) -> usize {
    self.max_in_flight.load(Ordering::SeqCst)
  }

  pub fn events(&self) -> Vec<String> {
    self.events.lock().unwrap().clone()
  }

  /// Names of all successfully launched processes, in launch order.
  pub fn launched(&self) -> Vec<String> {
    self
      .events()
      .into_iter()
      .filter_map(|event| event.strip_prefix("launch ").map(str::to_string))
      .collect()
  }

  fn record(&self, event: String) {
    self.events.lock().unwrap().push(event);
  }
}

#[async_trait]
impl Launcher for RecordingLauncher {
  type Process = RecordedProcess;

  fn launch(&self, command: &RenderCommand) -> io::Result<RecordedProcess> {
    if self.unlaunchable.contains(&command.name) {
      return Err(io::Error::new(io::ErrorKind::NotFound, "renderer not found"));
    }

    let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    self.max_in_flight.fetch_max(running, Ordering::SeqCst);
    self.record(format!("launch {}", command.name));

    Ok(RecordedProcess {
      name: command.name.clone(),
      output: command.output.clone(),
    })
  }

  async fn wait(&self, process: RecordedProcess) -> io::Result<ExitOutcome> {
    if !self.delay.is_zero() {
      tokio::time::sleep(self.delay).await;
    }
    self.in_flight.fetch_sub(1, Ordering::SeqCst);
    self.record(format!("exit {}", process.name));

    if self.failing.contains(&process.name) {
      return Ok(ExitOutcome { code: Some(1) });
    }
    if self.write_outputs {
      if let Some(parent) = process.output.parent() {
        std::fs::create_dir_all(parent)?;
      }
      std::fs::write(&process.output, b"solid")?;
    }
    Ok(ExitOutcome { code: Some(0) })
  }
}

/// Write an executable script at `dir/fake-openscad` that behaves like the
/// renderer: it writes `solid <name>` to the `-o` path and appends `<name>` to
/// `dir/calls.log`. Names containing `fail` exit 1 without writing.
#[cfg(unix)]
pub fn fake_renderer(dir: &Path) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let log = dir.join("calls.log");
  let script = format!(
    r#"#!/bin/sh
out=""
name=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    -P) name="$2"; shift 2 ;;
    -p) shift 2 ;;
    *) shift ;;
  esac
done
echo "$name" >> "{log}"
case "$name" in
  *fail*) exit 1 ;;
esac
echo "solid $name" > "$out"
"#,
    log = log.display()
  );

  let path = dir.join("fake-openscad");
  std::fs::write(&path, script).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}

/// Names the fake renderer was invoked with, in call order.
#[cfg(unix)]
pub fn fake_renderer_calls(dir: &Path) -> Vec<String> {
  std::fs::read_to_string(dir.join("calls.log"))
    .map(|log| log.lines().map(str::to_string).collect())
    .unwrap_or_default()
}
