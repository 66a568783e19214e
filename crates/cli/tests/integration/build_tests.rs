//! Integration tests for `scadsets build` and `scadsets plan`.

use predicates::prelude::*;

use crate::common::TestEnv;

const CUP_SETS: [&str; 6] = [
  "cup_40_plain",
  "cup_60_plain",
  "cup_80_plain",
  "cup_40_ribbed",
  "cup_60_ribbed",
  "cup_80_ribbed",
];

// =============================================================================
// Build
// =============================================================================

#[test]
fn build_renders_every_model() {
  let env = TestEnv::cup();

  env
    .cmd()
    .args(["build", "cup.scad"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Build complete"))
    .stdout(predicate::str::contains("Models rendered: 6"));

  assert!(env.path("cup.sets.json").exists());
  for name in CUP_SETS {
    let stl = std::fs::read_to_string(env.artifact("stl", name)).unwrap();
    assert_eq!(stl.trim(), format!("solid {}", name));
  }
  assert!(!env.path("cup_output").join("png").exists());
}

#[test]
fn build_accepts_model_without_extension() {
  let env = TestEnv::cup();

  env.cmd().args(["build", "cup"]).assert().success();
  assert_eq!(env.renderer_calls().len(), 6);
}

#[test]
fn second_build_renders_nothing() {
  let env = TestEnv::cup();

  env.cmd().args(["build", "cup.scad"]).assert().success();
  env
    .cmd()
    .args(["build", "cup.scad"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to render"));

  assert_eq!(env.renderer_calls().len(), 6);
}

#[test]
fn existing_models_are_skipped_unless_forced() {
  let env = TestEnv::cup();
  env.write_file("cup_output/stl/cup_40_plain.stl", "solid kept");
  env.write_file("cup_output/stl/cup_80_ribbed.stl", "solid kept");

  env.cmd().args(["build", "cup.scad"]).assert().success();
  let calls = env.renderer_calls();
  assert_eq!(calls.len(), 4);
  assert!(!calls.contains(&"cup_40_plain".to_string()));

  env.cmd().args(["build", "cup.scad", "--force"]).assert().success();
  assert_eq!(env.renderer_calls().len(), 10);
  let kept = std::fs::read_to_string(env.artifact("stl", "cup_40_plain")).unwrap();
  assert_eq!(kept.trim(), "solid cup_40_plain");
}

#[test]
fn images_render_before_models() {
  let env = TestEnv::cup();

  env
    .cmd()
    .args(["build", "cup.scad", "--images", "-s", "cup_60_ribbed"])
    .assert()
    .success();

  assert_eq!(env.renderer_calls(), vec!["cup_60_ribbed", "cup_60_ribbed"]);
  assert!(env.artifact("png", "cup_60_ribbed").exists());
  assert!(env.artifact("stl", "cup_60_ribbed").exists());
  assert!(!env.artifact("stl", "cup_40_plain").exists());
}

#[test]
fn sets_accept_comma_separated_names() {
  let env = TestEnv::cup();

  env
    .cmd()
    .args([
      "build",
      "cup.scad",
      "--sets",
      "cup_80_plain,cup_40_plain",
      "--concurrency",
      "1",
    ])
    .assert()
    .success();

  // Enumeration order, not request order.
  assert_eq!(env.renderer_calls(), vec!["cup_40_plain", "cup_80_plain"]);
}

#[test]
fn unknown_sets_are_warned_about() {
  let env = TestEnv::cup();

  env
    .cmd()
    .args(["build", "cup.scad", "-s", "cup_99_gold"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Unknown parameter set: cup_99_gold"));

  assert!(env.renderer_calls().is_empty());
}

#[test]
fn failing_renders_do_not_fail_the_build() {
  let env = TestEnv::cup();

  env
    .cmd()
    .env("FAKE_FAIL_RIBBED", "1")
    .args(["build", "cup.scad", "--concurrency", "2"])
    .assert()
    .success();

  assert!(env.artifact("stl", "cup_40_plain").exists());
  assert!(!env.artifact("stl", "cup_40_ribbed").exists());

  // The failed ones are retried on the next run.
  env.cmd().args(["build", "cup.scad"]).assert().success();
  assert!(env.artifact("stl", "cup_40_ribbed").exists());
  assert_eq!(env.renderer_calls().len(), 9);
}

#[test]
fn pool_strategy_renders_everything() {
  let env = TestEnv::cup();

  env
    .cmd()
    .args(["build", "cup.scad", "--pool", "--concurrency", "3"])
    .assert()
    .success();

  let mut calls = env.renderer_calls();
  calls.sort();
  let mut expected: Vec<String> = CUP_SETS.iter().map(|s| s.to_string()).collect();
  expected.sort();
  assert_eq!(calls, expected);
}

#[test]
fn command_line_prints_progress_dots() {
  let env = TestEnv::cup();

  env
    .cmd()
    .args(["build", "cup.scad", "--command-line"])
    .assert()
    .success()
    .stderr(predicate::str::contains("......"));
}

#[test]
fn custom_paths_are_honoured() {
  let env = TestEnv::cup();
  std::fs::rename(env.path("cup.config.json"), env.path("variants.json")).unwrap();

  env
    .cmd()
    .args([
      "build",
      "cup.scad",
      "-i",
      "variants.json",
      "--output-json",
      "cache/sets.json",
      "--output-dir",
      "renders",
    ])
    .assert()
    .success();

  assert!(env.path("cache/sets.json").exists());
  assert!(env.path("renders/stl/cup_60_plain.stl").exists());
  assert!(!env.path("cup.sets.json").exists());
}

#[test]
fn build_json_output() {
  let env = TestEnv::cup();

  let assert = env
    .cmd()
    .args(["--output", "json", "build", "cup.scad"])
    .assert()
    .success();

  let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(json["cache_status"], "written");
  assert_eq!(json["models"].as_array().unwrap().len(), 6);
  assert_eq!(json["launched"], 6);
  assert!(json["launch_failures"].as_array().unwrap().is_empty());
}

#[test]
fn missing_configuration_fails() {
  let env = TestEnv::with_fixtures(&["cup.scad"]);

  env
    .cmd()
    .args(["build", "cup.scad"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no input configuration given"));
}

#[test]
fn zero_concurrency_fails() {
  let env = TestEnv::cup();

  env
    .cmd()
    .args(["build", "cup.scad", "--concurrency", "0"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("concurrency must be at least 1"));

  assert!(!env.path("cup.sets.json").exists());
}

#[test]
fn missing_renderer_fails_the_build() {
  let env = TestEnv::cup();

  env
    .cmd()
    .args(["build", "cup.scad", "--openscad", "/nonexistent/openscad"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("could not be started"));
}

// =============================================================================
// Plan
// =============================================================================

#[test]
fn plan_writes_and_renders_nothing() {
  let env = TestEnv::cup();

  env
    .cmd()
    .args(["plan", "cup.scad", "--images"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Would render 6 image(s) and 6 model(s)"))
    .stdout(predicate::str::contains("unwritten"));

  assert!(!env.path("cup.sets.json").exists());
  assert!(!env.path("cup_output").exists());
  assert!(env.renderer_calls().is_empty());
}

#[test]
fn plan_after_build_is_empty() {
  let env = TestEnv::cup();

  env.cmd().args(["build", "cup.scad"]).assert().success();
  env
    .cmd()
    .args(["plan", "cup.scad"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to render"));
}

#[test]
fn plan_json_lists_commands() {
  let env = TestEnv::cup();

  let assert = env
    .cmd()
    .args(["--output", "json", "plan", "cup.scad", "-s", "cup_40_plain"])
    .assert()
    .success();

  let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(json["models"], serde_json::json!(["cup_40_plain"]));
  let command = json["commands"][0].as_str().unwrap();
  assert!(command.contains("-P cup_40_plain"));
  assert!(command.ends_with("cup.scad"));
}
