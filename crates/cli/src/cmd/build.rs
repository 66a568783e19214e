//! Implementation of the `scadsets build` command.

use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde_json::json;

use scadsets_lib::execute::{ArtifactKind, BuildSummary, BuildTarget, ProcessLauncher, build};

use super::BuildArgs;
use crate::output::{
  OutputFormat, format_duration, print_artifact, print_info, print_json, print_stat, print_success, print_warning,
};

/// Execute the build command.
///
/// Enumerates (or reuses) the parameter sets, then renders every missing
/// artifact. Renderer failures leave the artifact missing and do not fail the
/// command; a renderer that cannot be started does.
pub fn cmd_build(args: &BuildArgs, verbose: bool, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let target = args.target.target();
  let options = args.options();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let summary = rt
    .block_on(build(&target, &options, &ProcessLauncher))
    .context("Build failed")?;

  if options.progress && summary.report.launched > 0 {
    // Terminate the line of progress dots.
    eprintln!();
  }

  if output.is_json() {
    print_json(&summary_json(&summary, &target))?;
  } else {
    print_summary(&summary, &target, verbose, start);
  }

  if !summary.report.launch_failures.is_empty() {
    bail!(
      "{} render(s) could not be started with {}",
      summary.report.launch_failures.len(),
      target.program.display()
    );
  }

  Ok(())
}

fn print_summary(summary: &BuildSummary, target: &BuildTarget, verbose: bool, start: Instant) {
  for name in &summary.unknown_sets {
    print_warning(&format!("Unknown parameter set: {}", name));
  }
  for failure in &summary.report.launch_failures {
    print_warning(&format!(
      "Could not start {} render of {}: {}",
      failure.kind, failure.name, failure.message
    ));
  }

  if summary.is_noop() {
    print_info("Nothing to render");
  } else {
    print_success("Build complete!");
  }

  if verbose {
    for name in &summary.images {
      print_artifact(name, &target.layout.artifact_path(ArtifactKind::Image, name));
    }
    for name in &summary.models {
      print_artifact(name, &target.layout.artifact_path(ArtifactKind::Model, name));
    }
  }

  print_stat(
    "Parameter sets",
    &format!("{} ({})", summary.cache_path.display(), summary.cache_status.as_str()),
  );
  print_stat("Images rendered", &summary.images.len().to_string());
  print_stat("Models rendered", &summary.models.len().to_string());
  print_stat("Output", &target.layout.root().display().to_string());
  print_stat("Duration", &format_duration(start.elapsed()));
}

fn summary_json(summary: &BuildSummary, target: &BuildTarget) -> serde_json::Value {
  let failures: Vec<_> = summary
    .report
    .launch_failures
    .iter()
    .map(|f| json!({ "name": f.name, "kind": f.kind.as_str(), "error": f.message }))
    .collect();

  json!({
    "cache": summary.cache_path,
    "cache_status": summary.cache_status.as_str(),
    "output_dir": target.layout.root(),
    "images": summary.images,
    "models": summary.models,
    "unknown_sets": summary.unknown_sets,
    "launched": summary.report.launched,
    "launch_failures": failures,
  })
}
