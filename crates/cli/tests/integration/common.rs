//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the model, its
/// configuration, and a fake renderer.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// A directory containing copies of the given fixtures.
  pub fn with_fixtures(names: &[&str]) -> Self {
    let temp = TempDir::new().unwrap();
    for name in names {
      std::fs::copy(fixture_path(name), temp.path().join(name))
        .unwrap_or_else(|e| panic!("Failed to copy fixture {}: {}", name, e));
    }
    Self { temp }
  }

  /// The cup model with its configuration.
  pub fn cup() -> Self {
    Self::with_fixtures(&["cup.scad", "cup.config.json"])
  }

  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.temp.path().join(relative_path)
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.path(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Artifact path in the default output layout of the cup model.
  pub fn artifact(&self, kind: &str, name: &str) -> PathBuf {
    self.path("cup_output").join(kind).join(format!("{}.{}", name, kind))
  }

  /// Command for the scadsets binary, run inside the temp directory with the
  /// fake renderer configured.
  pub fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("scadsets");
    cmd.current_dir(self.temp.path());
    #[cfg(unix)]
    cmd.env("SCADSETS_OPENSCAD", fake_renderer(self.temp.path()));
    cmd
  }

  /// Parameter-set names the fake renderer was invoked with, in call order.
  pub fn renderer_calls(&self) -> Vec<String> {
    std::fs::read_to_string(self.path("calls.log"))
      .map(|log| log.lines().map(str::to_string).collect())
      .unwrap_or_default()
  }
}

/// Write `dir/fake-openscad`, a stand-in renderer.
///
/// It writes `solid <name>` to the `-o` path and appends `<name>` to
/// `dir/calls.log`. Names containing `ribbed` exit 1 when `FAKE_FAIL_RIBBED`
/// is set.
#[cfg(unix)]
pub fn fake_renderer(dir: &Path) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join("fake-openscad");
  if path.exists() {
    return path;
  }

  let script = format!(
    r#"#!/bin/sh
out=""
name=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    -P) name="$2"; shift 2 ;;
    -p) shift 2 ;;
    *) shift ;;
  esac
done
echo "$name" >> "{log}"
if [ -n "$FAKE_FAIL_RIBBED" ]; then
  case "$name" in
    *ribbed*) exit 1 ;;
  esac
fi
echo "solid $name" > "$out"
"#,
    log = dir.join("calls.log").display()
  );

  std::fs::write(&path, script).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}
