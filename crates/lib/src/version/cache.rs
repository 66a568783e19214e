//! Cache file handling for enumeration results.
//!
//! The cache file is trusted as-is: if it exists it is loaded verbatim and the
//! input configuration is not consulted. Pass `force` to recompute.
//!
//! The cache is not locked. Two invocations writing the same cache path at the
//! same time race; the write itself is atomic (temp file + rename), so the
//! last writer wins with a complete file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::Version;
use super::types::{CacheStatus, EnumerationResult, VersionConfig, VersionError};

/// Load a cache file.
pub fn load_cache(path: &Path) -> Result<EnumerationResult, VersionError> {
  let content = fs::read_to_string(path).map_err(|source| VersionError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  serde_json::from_str(&content).map_err(|source| VersionError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

/// Write a cache file atomically.
pub fn write_cache(path: &Path, result: &EnumerationResult) -> Result<(), VersionError> {
  let write_err = |source: io::Error| VersionError::Write {
    path: path.to_path_buf(),
    source,
  };

  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  fs::create_dir_all(dir).map_err(write_err)?;

  let content = serde_json::to_string_pretty(result).map_err(VersionError::Serialize)?;

  let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
  temp.write_all(content.as_bytes()).map_err(write_err)?;
  temp.persist(path).map_err(|e| write_err(e.error))?;

  debug!(path = %path.display(), count = result.count, "wrote cache file");
  Ok(())
}

/// Return the enumeration for `input`, using `cache_path` when possible.
///
/// - cache exists and `force` is false: load it, ignoring `input`
/// - otherwise: read `input`, enumerate, write the cache
///
/// # Errors
///
/// `MissingInput` when enumeration is needed but no input path was given,
/// `ConfigNotFound` when the input path does not exist, plus any read, parse,
/// variable, or write error.
pub fn load_or_enumerate(
  input: Option<&Path>,
  cache_path: &Path,
  force: bool,
) -> Result<(EnumerationResult, CacheStatus), VersionError> {
  let (result, status) = resolve(input, cache_path, force)?;
  if status == CacheStatus::Unwritten {
    write_cache(cache_path, &result)?;
    return Ok((result, CacheStatus::Written));
  }
  Ok((result, status))
}

/// Like [`load_or_enumerate`], but never writes the cache file.
pub fn peek_enumeration(
  input: Option<&Path>,
  cache_path: &Path,
  force: bool,
) -> Result<(EnumerationResult, CacheStatus), VersionError> {
  resolve(input, cache_path, force)
}

fn resolve(
  input: Option<&Path>,
  cache_path: &Path,
  force: bool,
) -> Result<(EnumerationResult, CacheStatus), VersionError> {
  if !force && cache_path.exists() {
    let result = load_cache(cache_path)?;
    info!(path = %cache_path.display(), count = result.len(), "reusing cached parameter sets");
    return Ok((result, CacheStatus::Reused));
  }

  let input = input.ok_or_else(|| VersionError::MissingInput(cache_path.to_path_buf()))?;
  let config = VersionConfig::from_file(input)?;
  let result = Version::from_config(&config)?.enumerate();
  Ok((result, CacheStatus::Unwritten))
}
