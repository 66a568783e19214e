//! Implementation of the `scadsets enumerate` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;

use scadsets_lib::version::load_or_enumerate;

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success};

pub fn cmd_enumerate(
  input: &Path,
  output_json: Option<PathBuf>,
  force: bool,
  verbose: bool,
  output: OutputFormat,
) -> Result<()> {
  let cache_path = output_json.unwrap_or_else(|| default_cache_path(input));

  let (result, status) = load_or_enumerate(Some(input), &cache_path, force)
    .with_context(|| format!("Failed to enumerate {}", input.display()))?;

  if output.is_json() {
    return print_json(&json!({
      "cache": cache_path,
      "cache_status": status.as_str(),
      "count": result.len(),
      "names": result.names().collect::<Vec<_>>(),
    }));
  }

  print_success(&format!("{} parameter set(s)", result.len()));
  print_stat("File", &cache_path.display().to_string());
  print_stat("Status", status.as_str());
  if verbose {
    for name in result.names() {
      print_info(name);
    }
  }
  Ok(())
}

/// `cup.config.json` and `cup.json` both map to `cup.sets.json`.
fn default_cache_path(input: &Path) -> PathBuf {
  let stem = input
    .file_stem()
    .map(|stem| stem.to_string_lossy().into_owned())
    .unwrap_or_default();
  let stem = stem.strip_suffix(".config").unwrap_or(&stem);
  input.with_file_name(format!("{}.sets.json", stem))
}
