//! Configuration scaffolding from an existing OpenSCAD parameter file.
//!
//! Given `model.json` (as written by the OpenSCAD customizer) and, if present,
//! `model.scad` next to it, produce a [`VersionConfig`] whose variables are
//! classified by [`infer_variable_spec`]. Variables that cannot be classified
//! get an editable placeholder entry.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use serde_json::json;
use tracing::{debug, info, warn};

use super::{InferError, InferredSpec, infer_variable_spec};
use crate::version::VersionConfig;

/// Tag written for variables whose kind could not be inferred.
pub const UNKNOWN_TAG: &str = "-range | -array | 0";

/// Payload written for variables whose kind could not be inferred.
pub const UNKNOWN_PAYLOAD: &str = r#"["a", "b", "c"] | 0:1:10"#;

/// A generated configuration and where its hints came from.
#[derive(Debug, Clone)]
pub struct Scaffold {
  pub config: VersionConfig,
  /// The model source used for inference, if one was found.
  pub model_source: Option<PathBuf>,
  /// Variables that received the placeholder entry and need editing.
  pub unresolved: Vec<String>,
}

/// Build a configuration scaffold from an OpenSCAD parameter file.
///
/// The template starts as the file stem; every ranged, listed, or unresolved
/// variable appends `_(name)` once. Opaque variables become fixed literals.
///
/// # Errors
///
/// - `NotFound` if the parameter file does not exist
/// - `EmptyParameterSets` if it contains no parameter sets
pub fn create_base_config(parameter_file: &Path) -> Result<Scaffold, InferError> {
  if !parameter_file.exists() {
    return Err(InferError::NotFound(parameter_file.to_path_buf()));
  }

  let content = fs::read_to_string(parameter_file).map_err(|source| InferError::Read {
    path: parameter_file.to_path_buf(),
    source,
  })?;
  let document: serde_json::Value = serde_json::from_str(&content).map_err(|source| InferError::Parse {
    path: parameter_file.to_path_buf(),
    source,
  })?;

  let parameter_sets = document
    .get("parameterSets")
    .and_then(serde_json::Value::as_object)
    .filter(|sets| !sets.is_empty())
    .ok_or_else(|| InferError::EmptyParameterSets(parameter_file.to_path_buf()))?;

  // Every variable once, in first-seen order across all parameter sets.
  let keys: IndexSet<&str> = parameter_sets
    .values()
    .filter_map(serde_json::Value::as_object)
    .flat_map(|set| set.keys().map(String::as_str))
    .collect();

  let source_path = parameter_file.with_extension("scad");
  let source = match fs::read_to_string(&source_path) {
    Ok(text) => Some(text),
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      warn!(
        path = %source_path.display(),
        "no model source found; variable kinds cannot be inferred"
      );
      None
    }
    Err(source) => {
      return Err(InferError::Read {
        path: source_path,
        source,
      });
    }
  };

  let mut set_name = parameter_file
    .file_stem()
    .map(|stem| stem.to_string_lossy().into_owned())
    .unwrap_or_default();
  let mut set = IndexMap::new();
  let mut variables = IndexMap::new();
  let mut unresolved = Vec::new();

  for key in keys {
    let spec = match &source {
      Some(text) => infer_variable_spec(text, key),
      None => InferredSpec::NotFound,
    };
    debug!(variable = key, spec = ?spec, "inferred variable");

    match spec {
      InferredSpec::Range(range) => {
        set_name.push_str(&format!("_({})", key));
        set.insert(key.to_string(), json!("-range"));
        variables.insert(key.to_string(), json!(range));
      }
      InferredSpec::List(choices) => {
        set_name.push_str(&format!("_({})", key));
        set.insert(key.to_string(), json!("-array"));
        variables.insert(key.to_string(), json!(choices));
      }
      InferredSpec::Opaque(expression) => {
        set.insert(key.to_string(), opaque_literal(&expression));
      }
      InferredSpec::NotFound => {
        set_name.push_str(&format!("_({})", key));
        set.insert(key.to_string(), json!(UNKNOWN_TAG));
        variables.insert(key.to_string(), json!(UNKNOWN_PAYLOAD));
        unresolved.push(key.to_string());
      }
    }
  }

  info!(
    variables = set.len(),
    unresolved = unresolved.len(),
    template = %set_name,
    "scaffolded configuration"
  );

  Ok(Scaffold {
    config: VersionConfig {
      set_name,
      set,
      variables,
    },
    model_source: source.map(|_| source_path),
    unresolved,
  })
}

/// A scalar literal for an opaque expression.
///
/// JSON scalars (`2`, `"hi"`, `true`) are kept as such; anything else, such as a
/// vector `[1, 2, 3]`, is kept as its source text so it stays a single value.
fn opaque_literal(expression: &str) -> serde_json::Value {
  match serde_json::from_str::<serde_json::Value>(expression) {
    Ok(value) if !(value.is_array() || value.is_object() || value.is_null()) => value,
    _ => json!(expression),
  }
}

/// Write a configuration document, refusing to overwrite unless `overwrite` is set.
pub fn write_config(path: &Path, config: &VersionConfig, overwrite: bool) -> Result<(), InferError> {
  if path.exists() && !overwrite {
    return Err(InferError::PathExists {
      path: path.to_path_buf(),
    });
  }

  let content = serde_json::to_string_pretty(config).map_err(InferError::Serialize)?;
  fs::write(path, content).map_err(|source| InferError::Write {
    path: path.to_path_buf(),
    source,
  })
}
