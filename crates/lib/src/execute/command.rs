//! Renderer command construction.
//!
//! Commands mirror the OpenSCAD command line so existing pipelines keep working:
//!
//! ```text
//! openscad --render -q -o <out>.png -p <cache.json> -P <name> <model.scad>
//! openscad -q -o <out>.stl -p <cache.json> -P <name> <model.scad>
//! ```
//!
//! Arguments are passed to the process directly, without a shell.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use super::types::{ArtifactKind, OutputLayout};

/// Environment variable overriding the renderer binary.
pub const RENDERER_ENV: &str = "SCADSETS_OPENSCAD";

/// Renderer binary used when nothing else is configured.
pub const DEFAULT_RENDERER: &str = "openscad";

/// The external renderer and the inputs shared by every render of one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
  /// Renderer binary.
  pub program: PathBuf,
  /// Model source passed as the last argument.
  pub model: PathBuf,
  /// Parameter file (the cache) passed with `-p`.
  pub parameter_file: PathBuf,
}

impl Renderer {
  pub fn new(program: impl Into<PathBuf>, model: impl Into<PathBuf>, parameter_file: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      model: model.into(),
      parameter_file: parameter_file.into(),
    }
  }

  /// Renderer binary from `SCADSETS_OPENSCAD`, falling back to `openscad`.
  pub fn program_from_env() -> PathBuf {
    std::env::var_os(RENDERER_ENV)
      .filter(|value| !value.is_empty())
      .map(PathBuf::from)
      .unwrap_or_else(|| PathBuf::from(DEFAULT_RENDERER))
  }

  /// Build the command rendering the `kind` artifact of parameter set `name`.
  pub fn command(&self, kind: ArtifactKind, name: &str, layout: &OutputLayout) -> RenderCommand {
    let output = layout.artifact_path(kind, name);

    let mut args: Vec<OsString> = Vec::with_capacity(9);
    if kind == ArtifactKind::Image {
      args.push("--render".into());
    }
    args.push("-q".into());
    args.push("-o".into());
    args.push(output.clone().into_os_string());
    args.push("-p".into());
    args.push(self.parameter_file.clone().into_os_string());
    args.push("-P".into());
    args.push(name.into());
    args.push(self.model.clone().into_os_string());

    RenderCommand {
      name: name.to_string(),
      kind,
      program: self.program.clone(),
      args,
      output,
    }
  }

  /// Build one command per name.
  pub fn commands<'a, I>(&self, kind: ArtifactKind, names: I, layout: &OutputLayout) -> Vec<RenderCommand>
  where
    I: IntoIterator<Item = &'a str>,
  {
    names.into_iter().map(|name| self.command(kind, name, layout)).collect()
  }
}

/// A single renderer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCommand {
  /// Parameter-set name selected with `-P`.
  pub name: String,
  pub kind: ArtifactKind,
  pub program: PathBuf,
  pub args: Vec<OsString>,
  /// Artifact written by the renderer.
  pub output: PathBuf,
}

impl RenderCommand {
  pub fn output(&self) -> &Path {
    &self.output
  }
}

impl fmt::Display for RenderCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program.display())?;
    for arg in &self.args {
      write!(f, " {}", arg.to_string_lossy())?;
    }
    Ok(())
  }
}
