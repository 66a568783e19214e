//! Configuration document, enumeration result, and error types.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::set::ParameterSet;
use crate::variable::VariableError;

/// Value of `fileFormatVersion` written to the cache file.
pub const FORMAT_VERSION: u32 = 1;

/// A compact description of a parameter space.
///
/// ```json
/// {
///   "set_name": "box_(size)_(color)",
///   "set": { "size": "-range", "color": "-array", "wall": 2 },
///   "variables": { "size": "10:10:50", "color": ["red", "dark blue"] }
/// }
/// ```
///
/// Key order in `set` is significant: it is the digit order of the enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionConfig {
  /// Name template with `(variable)` placeholders.
  pub set_name: String,

  /// Variable name to type tag (`-range`, `-array`) or literal value.
  #[serde(default)]
  pub set: IndexMap<String, serde_json::Value>,

  /// Variable name to the tag's payload. Falls back to the `set` entry when absent.
  #[serde(default)]
  pub variables: IndexMap<String, serde_json::Value>,
}

impl VersionConfig {
  /// Read a configuration document from disk.
  ///
  /// # Errors
  ///
  /// `ConfigNotFound` if the file does not exist, `Read`/`Parse` otherwise.
  pub fn from_file(path: &Path) -> Result<Self, VersionError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(VersionError::ConfigNotFound(path.to_path_buf())),
      Err(source) => {
        return Err(VersionError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    serde_json::from_str(&content).map_err(|source| VersionError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }
}

/// The enumerated, named parameter sets. This is also the cache file format,
/// which doubles as an OpenSCAD parameter file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumerationResult {
  #[serde(deserialize_with = "format_version")]
  pub file_format_version: u32,
  pub parameter_sets: IndexMap<String, ParameterSet>,
  #[serde(default)]
  pub count: usize,
}

impl EnumerationResult {
  pub fn new(parameter_sets: IndexMap<String, ParameterSet>) -> Self {
    Self {
      file_format_version: FORMAT_VERSION,
      count: parameter_sets.len(),
      parameter_sets,
    }
  }

  /// Parameter-set names in enumeration order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.parameter_sets.keys().map(String::as_str)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.parameter_sets.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.parameter_sets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.parameter_sets.is_empty()
  }
}

/// Accept the format version as a number or, as OpenSCAD writes it, a numeric string.
fn format_version<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
  D: serde::Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    Number(u32),
    Text(String),
  }

  match Raw::deserialize(deserializer)? {
    Raw::Number(n) => Ok(n),
    Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
  }
}

/// Whether the enumeration came from an existing cache file or was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
  Reused,
  Written,
  /// Computed from the input but not persisted (dry run).
  Unwritten,
}

impl CacheStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      CacheStatus::Reused => "reused",
      CacheStatus::Written => "written",
      CacheStatus::Unwritten => "unwritten",
    }
  }
}

/// Errors that can occur while enumerating or caching parameter sets.
#[derive(Debug, Error)]
pub enum VersionError {
  #[error("config file not found: {}", .0.display())]
  ConfigNotFound(PathBuf),

  #[error("no input configuration given and no cache file at {}", .0.display())]
  MissingInput(PathBuf),

  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    source: serde_json::Error,
  },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error("failed to serialize enumeration: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("invalid variable: {0}")]
  Variable(#[from] VariableError),

  #[error("too many parameter sets: {variables} variables have more combinations than can be counted")]
  TooManySets { variables: usize },
}
