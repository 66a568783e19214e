//! Heuristic variable inference from model source text.
//!
//! OpenSCAD customizer annotations live in trailing comments:
//!
//! ```text
//! size = 20;            // [10:5:40]
//! color = "red";        // [red, green, "dark blue"]
//! wall = 2;
//! ```
//!
//! [`infer_variable_spec`] classifies one variable from such text. It is a
//! best-effort helper for scaffolding configurations (see [`scaffold`]); the
//! enumeration itself never depends on it.

pub mod scaffold;

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

pub use scaffold::{Scaffold, create_base_config, write_config};

/// `[start:end]` or `[start:step:end]`.
static RANGE_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\[\s*-?[0-9.]+\s*(?::\s*-?[0-9.]+\s*){1,2}\]").expect("range annotation regex is valid")
});

/// `[a, b, c]`, optionally with quoted items or `value:Label` pairs.
static LIST_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"\[[\w:=" .\-]+(?:,[\w:=" .\-]*)*\]"#).expect("list annotation regex is valid")
});

/// What the model source says about a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferredSpec {
  /// Annotated with a numeric range; holds the bracketed range text.
  Range(String),
  /// Annotated with a list of choices; holds the choice values.
  List(Vec<String>),
  /// Assigned without a usable annotation; holds the assigned expression.
  Opaque(String),
  /// No assignment for the variable was found.
  NotFound,
}

/// Errors that can occur while scaffolding a configuration.
#[derive(Debug, Error)]
pub enum InferError {
  #[error("parameter file not found: {}", .0.display())]
  NotFound(PathBuf),

  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    source: serde_json::Error,
  },

  #[error("parameterSets must not be empty in {}", .0.display())]
  EmptyParameterSets(PathBuf),

  #[error("file already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: std::io::Error },

  #[error("failed to serialize configuration: {0}")]
  Serialize(#[source] serde_json::Error),
}

/// Classify variable `name` from model source text.
///
/// Finds the first line assigning `name` (`name = value;`), then looks at its
/// trailing `//` comment:
/// - a range annotation yields `Range`
/// - a list annotation yields `List`
/// - no comment yields `Opaque` with the assigned value
/// - any other comment yields `NotFound`, leaving the variable for the user to classify
pub fn infer_variable_spec(source: &str, name: &str) -> InferredSpec {
  let pattern = format!(r"(?m)^[ \t]*{}[ \t]*=[ \t]*(.*?);[ \t]*(//.*)?", regex::escape(name));
  let Ok(assignment) = Regex::new(&pattern) else {
    return InferredSpec::NotFound;
  };

  let Some(captures) = assignment.captures(source) else {
    return InferredSpec::NotFound;
  };

  let value = captures.get(1).map(|m| m.as_str().trim().to_string()).unwrap_or_default();

  let Some(comment) = captures.get(2).map(|m| m.as_str()) else {
    return InferredSpec::Opaque(value);
  };

  if let Some(range) = RANGE_ANNOTATION.find(comment) {
    return InferredSpec::Range(range.as_str().to_string());
  }
  if let Some(list) = LIST_ANNOTATION.find(comment) {
    return InferredSpec::List(parse_choices(list.as_str()));
  }
  InferredSpec::NotFound
}

/// Split `[a, "b c", 10:Ten]` into `["a", "b c", "10"]`.
///
/// For `value:Label` pairs only the value is kept. Empty items are skipped.
fn parse_choices(list: &str) -> Vec<String> {
  list
    .trim_start_matches('[')
    .trim_end_matches(']')
    .split(',')
    .map(|item| {
      let item = item.trim();
      let value = item.split_once(':').map(|(value, _label)| value).unwrap_or(item);
      value.trim().trim_matches('"').trim().to_string()
    })
    .filter(|item| !item.is_empty())
    .collect()
}
