//! Types for artifact planning and render dispatch.
//!
//! This module defines the error types, result types, and configuration
//! for turning enumerated parameter sets into rendered artifacts.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::version::{CacheStatus, VersionError};

/// Default number of renderer processes allowed to run at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// The two kinds of artifact produced per parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
  /// Preview image (`.png`).
  Image,
  /// Solid model (`.stl`).
  Model,
}

impl ArtifactKind {
  pub fn extension(self) -> &'static str {
    match self {
      ArtifactKind::Image => "png",
      ArtifactKind::Model => "stl",
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      ArtifactKind::Image => "image",
      ArtifactKind::Model => "model",
    }
  }
}

impl fmt::Display for ArtifactKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Where artifacts are written.
///
/// ```text
/// {root}/
/// ├── png/<name>.png
/// └── stl/<name>.stl
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
  root: PathBuf,
}

impl OutputLayout {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Directory holding artifacts of `kind`.
  pub fn dir(&self, kind: ArtifactKind) -> PathBuf {
    self.root.join(kind.extension())
  }

  /// Path of the `kind` artifact for parameter set `name`.
  pub fn artifact_path(&self, kind: ArtifactKind, name: &str) -> PathBuf {
    self.dir(kind).join(format!("{}.{}", name, kind.extension()))
  }

  /// Create the artifact directory for each of `kinds`.
  pub fn ensure_dirs(&self, kinds: &[ArtifactKind]) -> Result<(), ExecuteError> {
    for kind in kinds {
      let dir = self.dir(*kind);
      std::fs::create_dir_all(&dir).map_err(|source| ExecuteError::CreateDir { path: dir, source })?;
    }
    Ok(())
  }
}

/// How a list of render commands is spread over processes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchStrategy {
  /// Launch `concurrency` commands, wait for all of them, then launch the next chunk.
  #[default]
  Chunked,
  /// Keep up to `concurrency` commands running, starting the next as soon as one exits.
  Pool,
}

/// Options controlling a build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
  /// Also render preview images.
  pub images: bool,

  /// Only process these parameter sets. Empty means all.
  pub sets: Vec<String>,

  /// Recompute the cache and re-render artifacts that already exist.
  pub force: bool,

  /// Maximum number of renderer processes running at once. Must be at least 1.
  pub concurrency: usize,

  /// Print a `.` to stderr for every launched process.
  pub progress: bool,

  pub strategy: DispatchStrategy,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      images: false,
      sets: Vec::new(),
      force: false,
      concurrency: DEFAULT_CONCURRENCY,
      progress: false,
      strategy: DispatchStrategy::default(),
    }
  }
}

/// Exit information of a finished renderer process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
  /// Exit code, or `None` if the process was terminated by a signal.
  pub code: Option<i32>,
}

impl ExitOutcome {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

/// A command that failed to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchFailure {
  pub name: String,
  pub kind: ArtifactKind,
  pub message: String,
}

/// What happened while dispatching a list of commands.
///
/// Exit codes are deliberately not collected: a failed render simply leaves
/// its artifact missing, and the next run picks it up again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
  /// Commands whose process was started and waited for.
  pub launched: usize,

  /// Commands whose process could not be started.
  pub launch_failures: Vec<LaunchFailure>,
}

impl DispatchReport {
  pub fn merge(&mut self, other: DispatchReport) {
    self.launched += other.launched;
    self.launch_failures.extend(other.launch_failures);
  }
}

/// Result of a build.
#[derive(Debug, Clone)]
pub struct BuildSummary {
  /// Parameter sets whose image was dispatched.
  pub images: Vec<String>,

  /// Parameter sets whose model was dispatched.
  pub models: Vec<String>,

  /// Cache file holding the parameter sets.
  pub cache_path: PathBuf,

  /// Whether the cache was reused or (re)written.
  pub cache_status: CacheStatus,

  /// Requested parameter sets that do not exist in the cache.
  pub unknown_sets: Vec<String>,

  pub report: DispatchReport,
}

impl BuildSummary {
  /// Returns true if no render was dispatched.
  pub fn is_noop(&self) -> bool {
    self.images.is_empty() && self.models.is_empty()
  }
}

/// Errors that can occur while planning or rendering artifacts.
#[derive(Debug, Error)]
pub enum ExecuteError {
  #[error("concurrency must be at least 1, got {0}")]
  InvalidConcurrency(usize),

  #[error("model source not found: {}", .0.display())]
  ModelNotFound(PathBuf),

  #[error("unknown parameter set: {0}")]
  UnknownSet(String),

  #[error(transparent)]
  Version(#[from] VersionError),

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to launch {}: {source}", program.display())]
  Launch { program: PathBuf, source: io::Error },

  #[error("failed to wait for {kind} render of {name}: {source}")]
  Wait {
    name: String,
    kind: ArtifactKind,
    source: io::Error,
  },

  #[error("{kind} render of {name} failed with exit code {code:?}")]
  RenderFailed {
    name: String,
    kind: ArtifactKind,
    code: Option<i32>,
  },
}
