//! Implementation of the `scadsets init` command.
//!
//! Scaffolds a configuration from the parameter file the OpenSCAD customizer
//! writes next to a model, using annotations in the model source to classify
//! each variable.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::json;
use tracing::info;

use scadsets_lib::infer::{create_base_config, write_config};

use crate::output::{OutputFormat, print_json, print_stat, print_warning, symbols};

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the parameter file is missing or has no parameter
/// sets, or if the configuration already exists and `force` is not set.
pub fn cmd_init(parameter_file: &Path, out: Option<PathBuf>, force: bool, output: OutputFormat) -> Result<()> {
  let scaffold = create_base_config(parameter_file)
    .with_context(|| format!("Failed to scaffold configuration from {}", parameter_file.display()))?;

  let path = out.unwrap_or_else(|| default_config_path(parameter_file));
  write_config(&path, &scaffold.config, force).context("Failed to write configuration")?;
  info!(path = %path.display(), "wrote configuration");

  if output.is_json() {
    return print_json(&json!({
      "path": path,
      "model_source": scaffold.model_source,
      "unresolved": scaffold.unresolved,
      "config": scaffold.config,
    }));
  }

  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    "Scaffolded configuration!".green().bold()
  );
  println!();
  print_stat("Config", &path.display().to_string());
  print_stat("Name template", &scaffold.config.set_name);
  print_stat("Variables", &scaffold.config.set.len().to_string());
  match &scaffold.model_source {
    Some(source) => print_stat("Model source", &source.display().to_string()),
    None => print_warning("No model source found; every variable needs editing"),
  }
  for name in &scaffold.unresolved {
    print_warning(&format!("Variable {} could not be classified; edit its entry", name));
  }

  Ok(())
}

/// `dir/cup.json` maps to `dir/cup.config.json`.
fn default_config_path(parameter_file: &Path) -> PathBuf {
  let stem = parameter_file
    .file_stem()
    .map(|stem| stem.to_string_lossy().into_owned())
    .unwrap_or_default();
  parameter_file.with_file_name(format!("{}.config.json", stem))
}
