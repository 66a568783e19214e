//! Integration tests for `scadsets render`.

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn render_single_model() {
  let env = TestEnv::cup();

  env
    .cmd()
    .args(["render", "cup.scad", "cup_80_ribbed"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Rendered model cup_80_ribbed"));

  assert_eq!(env.renderer_calls(), vec!["cup_80_ribbed"]);
  assert!(env.artifact("stl", "cup_80_ribbed").exists());
  assert!(env.path("cup.sets.json").exists());
}

#[test]
fn render_replaces_existing_artifact() {
  let env = TestEnv::cup();
  env.write_file("cup_output/png/cup_40_plain.png", "old");

  env
    .cmd()
    .args(["render", "cup.scad", "cup_40_plain", "--image"])
    .assert()
    .success();

  let png = std::fs::read_to_string(env.artifact("png", "cup_40_plain")).unwrap();
  assert_eq!(png.trim(), "solid cup_40_plain");
}

#[test]
fn render_failure_is_fatal() {
  let env = TestEnv::cup();

  env
    .cmd()
    .env("FAKE_FAIL_RIBBED", "1")
    .args(["render", "cup.scad", "cup_40_ribbed"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("model render of cup_40_ribbed failed"));
}

#[test]
fn render_unknown_set_fails() {
  let env = TestEnv::cup();

  env
    .cmd()
    .args(["render", "cup.scad", "cup_10_gold"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown parameter set: cup_10_gold"));

  assert!(env.renderer_calls().is_empty());
}

#[test]
fn render_json_output() {
  let env = TestEnv::cup();

  let assert = env
    .cmd()
    .args(["--output", "json", "render", "cup.scad", "cup_60_plain"])
    .assert()
    .success();

  let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(json["name"], "cup_60_plain");
  assert_eq!(json["kind"], "model");
  assert!(json["path"].as_str().unwrap().ends_with("cup_60_plain.stl"));
}
