//! Implementation of the `scadsets render` command.
//!
//! Renders one artifact unconditionally. Unlike `build`, a failing renderer is
//! an error.

use anyhow::{Context, Result};
use serde_json::json;

use scadsets_lib::execute::{ArtifactKind, ProcessLauncher, render_artifact};

use super::RenderArgs;
use crate::output::{OutputFormat, print_json, print_success};

pub fn cmd_render(args: &RenderArgs, output: OutputFormat) -> Result<()> {
  let target = args.target.target();
  let kind = if args.image {
    ArtifactKind::Image
  } else {
    ArtifactKind::Model
  };

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let path = rt
    .block_on(render_artifact(&target, &args.name, kind, &ProcessLauncher))
    .with_context(|| format!("Failed to render {}", args.name))?;

  if output.is_json() {
    print_json(&json!({ "name": args.name, "kind": kind.as_str(), "path": path }))?;
  } else {
    print_success(&format!("Rendered {} {}: {}", kind, args.name, path.display()));
  }
  Ok(())
}
