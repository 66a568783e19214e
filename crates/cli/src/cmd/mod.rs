mod build;
mod enumerate;
mod init;
mod plan;
mod render;

use std::path::PathBuf;

use clap::Args;

use scadsets_lib::execute::{BuildOptions, BuildTarget, DEFAULT_CONCURRENCY, DispatchStrategy};

pub use build::cmd_build;
pub use enumerate::cmd_enumerate;
pub use init::cmd_init;
pub use plan::cmd_plan;
pub use render::cmd_render;

/// Where a model's inputs and outputs live.
#[derive(Args, Debug)]
pub struct TargetArgs {
  /// Model source (the .scad extension may be omitted)
  pub model: PathBuf,

  /// Configuration document to enumerate (default: <model>.config.json)
  #[arg(short = 'i', long = "input-json")]
  pub input_json: Option<PathBuf>,

  /// Parameter-set file (default: <model>.sets.json)
  #[arg(long = "output-json")]
  pub output_json: Option<PathBuf>,

  /// Artifact directory (default: <model>_output)
  #[arg(long)]
  pub output_dir: Option<PathBuf>,

  /// Renderer binary (default: $SCADSETS_OPENSCAD or openscad)
  #[arg(long)]
  pub openscad: Option<PathBuf>,
}

impl TargetArgs {
  pub fn target(&self) -> BuildTarget {
    // Absolute paths so the renderer does not depend on the working directory.
    let model = BuildTarget::for_model(&self.model).model;
    let model = dunce::canonicalize(&model).unwrap_or(model);

    let mut target = BuildTarget::for_model(model);
    if let Some(input) = &self.input_json {
      target = target.with_input(input);
    }
    if let Some(cache) = &self.output_json {
      target = target.with_cache_path(cache);
    }
    if let Some(dir) = &self.output_dir {
      target = target.with_output_dir(dir);
    }
    if let Some(program) = &self.openscad {
      target = target.with_program(program);
    }
    target
  }
}

#[derive(Args, Debug)]
pub struct BuildArgs {
  #[command(flatten)]
  pub target: TargetArgs,

  /// Also render preview images
  #[arg(long)]
  pub images: bool,

  /// Only process these parameter sets
  #[arg(short = 's', long = "sets", value_name = "NAME", value_delimiter = ',')]
  pub sets: Vec<String>,

  /// Re-enumerate and re-render everything
  #[arg(short, long)]
  pub force: bool,

  /// Maximum number of renderer processes at once
  #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
  pub concurrency: usize,

  /// Print a dot for every renderer started
  #[arg(long = "command-line")]
  pub command_line: bool,

  /// Start the next render as soon as one finishes instead of batch by batch
  #[arg(long)]
  pub pool: bool,
}

impl BuildArgs {
  pub fn options(&self) -> BuildOptions {
    BuildOptions {
      images: self.images,
      sets: self.sets.clone(),
      force: self.force,
      concurrency: self.concurrency,
      progress: self.command_line,
      strategy: if self.pool {
        DispatchStrategy::Pool
      } else {
        DispatchStrategy::Chunked
      },
    }
  }
}

#[derive(Args, Debug)]
pub struct RenderArgs {
  #[command(flatten)]
  pub target: TargetArgs,

  /// Parameter set to render
  pub name: String,

  /// Render the preview image instead of the model
  #[arg(long)]
  pub image: bool,
}
