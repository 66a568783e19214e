//! Build orchestration.
//!
//! This module turns enumerated parameter sets into rendered artifacts:
//! - Resolving the enumeration (cache file or fresh enumeration)
//! - Scanning the output layout for missing artifacts
//! - Dispatching one renderer process per missing artifact, bounded by the
//!   configured concurrency
//!
//! Images are dispatched before models. Renderer exit codes are ignored in
//! bulk builds; a failed artifact stays missing and is retried by the next run.

pub mod command;
pub mod dispatch;
pub mod launcher;
pub mod plan;
pub mod render;
pub mod types;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::version::{CacheStatus, load_or_enumerate, peek_enumeration};

pub use command::{DEFAULT_RENDERER, RENDERER_ENV, RenderCommand, Renderer};
pub use dispatch::dispatch;
pub use launcher::{Launcher, ProcessLauncher};
pub use plan::{JobPlan, plan_jobs};
pub use render::render_one;
pub use types::{
  ArtifactKind, BuildOptions, BuildSummary, DEFAULT_CONCURRENCY, DispatchReport, DispatchStrategy, ExecuteError,
  ExitOutcome, LaunchFailure, OutputLayout,
};

/// Everything a build needs to know about one model.
///
/// Paths default relative to the model source (see [`BuildTarget::for_model`])
/// and can be overridden individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
  /// Model source (`.scad`).
  pub model: PathBuf,
  /// Configuration document to enumerate when the cache is missing or forced.
  pub input: Option<PathBuf>,
  /// Cache file, also passed to the renderer as its parameter file.
  pub cache_path: PathBuf,
  pub layout: OutputLayout,
  /// Renderer binary.
  pub program: PathBuf,
}

impl BuildTarget {
  /// Defaults for `model`:
  ///
  /// ```text
  /// <dir>/<stem>.scad            model (".scad" is appended unless already present)
  /// <dir>/<stem>.config.json     input, used when present and no input is set
  /// <dir>/<stem>.sets.json       cache
  /// <dir>/<stem>_output/         output layout root
  /// ```
  ///
  /// The renderer comes from `SCADSETS_OPENSCAD`, or `openscad`.
  pub fn for_model(model: impl Into<PathBuf>) -> Self {
    let mut model = model.into();
    if !model.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("scad")) {
      let mut path = model.into_os_string();
      path.push(".scad");
      model = PathBuf::from(path);
    }

    let dir = model.parent().map(Path::to_path_buf).unwrap_or_default();
    let stem = model_stem(&model);

    Self {
      input: None,
      cache_path: dir.join(format!("{stem}.sets.json")),
      layout: OutputLayout::new(dir.join(format!("{stem}_output"))),
      program: Renderer::program_from_env(),
      model,
    }
  }

  pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
    self.input = Some(input.into());
    self
  }

  pub fn with_cache_path(mut self, cache_path: impl Into<PathBuf>) -> Self {
    self.cache_path = cache_path.into();
    self
  }

  pub fn with_output_dir(mut self, root: impl Into<PathBuf>) -> Self {
    self.layout = OutputLayout::new(root);
    self
  }

  pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
    self.program = program.into();
    self
  }

  /// The configuration to enumerate: the explicit input, else
  /// `<dir>/<stem>.config.json` if it exists.
  pub fn resolved_input(&self) -> Option<PathBuf> {
    if let Some(input) = &self.input {
      return Some(input.clone());
    }
    let fallback = self
      .model
      .with_file_name(format!("{}.config.json", model_stem(&self.model)));
    fallback.exists().then_some(fallback)
  }

  pub fn renderer(&self) -> Renderer {
    Renderer::new(&self.program, &self.model, &self.cache_path)
  }

  fn ensure_model(&self) -> Result<(), ExecuteError> {
    if self.model.is_file() {
      Ok(())
    } else {
      Err(ExecuteError::ModelNotFound(self.model.clone()))
    }
  }
}

fn model_stem(model: &Path) -> String {
  model
    .file_stem()
    .map(|stem| stem.to_string_lossy().into_owned())
    .unwrap_or_default()
}

/// What a build would do, without doing it.
#[derive(Debug, Clone)]
pub struct BuildPlan {
  pub jobs: JobPlan,
  /// Render commands in dispatch order (images, then models).
  pub commands: Vec<RenderCommand>,
  pub cache_path: PathBuf,
  pub cache_status: CacheStatus,
}

/// Render every missing artifact of `target`.
///
/// 1. Resolve the enumeration from the cache, or enumerate and write the cache
/// 2. Scan for missing artifacts
/// 3. Dispatch missing images, then missing models
///
/// With `force` unset, running a build twice dispatches nothing the second time
/// (provided the renderer succeeded).
///
/// # Errors
///
/// Fails before dispatching anything on invalid concurrency, a missing model
/// source, or a cache/enumeration error. Renderer failures are not errors.
pub async fn build<L: Launcher>(
  target: &BuildTarget,
  options: &BuildOptions,
  launcher: &L,
) -> Result<BuildSummary, ExecuteError> {
  if options.concurrency == 0 {
    return Err(ExecuteError::InvalidConcurrency(options.concurrency));
  }
  target.ensure_model()?;

  let input = target.resolved_input();
  let (result, cache_status) = load_or_enumerate(input.as_deref(), &target.cache_path, options.force)?;
  let jobs = plan_jobs(&result, &target.layout, options);

  let mut kinds = vec![ArtifactKind::Model];
  if options.images {
    kinds.push(ArtifactKind::Image);
  }
  target.layout.ensure_dirs(&kinds)?;

  let renderer = target.renderer();
  let mut report = DispatchReport::default();
  for kind in [ArtifactKind::Image, ArtifactKind::Model] {
    let commands = renderer.commands(kind, jobs.names(kind).iter().map(String::as_str), &target.layout);
    debug!(%kind, jobs = commands.len(), "dispatching artifact kind");
    report.merge(dispatch(&commands, launcher, options.concurrency, options.strategy, options.progress).await?);
  }

  info!(
    model = %target.model.display(),
    images = jobs.images.len(),
    models = jobs.models.len(),
    launch_failures = report.launch_failures.len(),
    "build finished"
  );

  Ok(BuildSummary {
    images: jobs.images,
    models: jobs.models,
    cache_path: target.cache_path.clone(),
    cache_status,
    unknown_sets: jobs.unknown,
    report,
  })
}

/// Work out what [`build`] would dispatch. Writes nothing, not even the cache.
pub fn plan_build(target: &BuildTarget, options: &BuildOptions) -> Result<BuildPlan, ExecuteError> {
  target.ensure_model()?;

  let input = target.resolved_input();
  let (result, cache_status) = peek_enumeration(input.as_deref(), &target.cache_path, options.force)?;
  let jobs = plan_jobs(&result, &target.layout, options);

  let renderer = target.renderer();
  let commands = [ArtifactKind::Image, ArtifactKind::Model]
    .into_iter()
    .flat_map(|kind| renderer.commands(kind, jobs.names(kind).iter().map(String::as_str), &target.layout))
    .collect();

  Ok(BuildPlan {
    jobs,
    commands,
    cache_path: target.cache_path.clone(),
    cache_status,
  })
}

/// Render the `kind` artifact of a single parameter set, regardless of whether
/// it already exists.
///
/// # Errors
///
/// `UnknownSet` if `name` is not in the enumeration, and any [`render_one`]
/// error, including `RenderFailed` on a non-zero renderer exit.
pub async fn render_artifact<L: Launcher>(
  target: &BuildTarget,
  name: &str,
  kind: ArtifactKind,
  launcher: &L,
) -> Result<PathBuf, ExecuteError> {
  target.ensure_model()?;

  let input = target.resolved_input();
  let (result, _) = load_or_enumerate(input.as_deref(), &target.cache_path, false)?;
  if !result.contains(name) {
    return Err(ExecuteError::UnknownSet(name.to_string()));
  }

  target.layout.ensure_dirs(&[kind])?;
  render_one(&target.renderer().command(kind, name, &target.layout), launcher).await
}
