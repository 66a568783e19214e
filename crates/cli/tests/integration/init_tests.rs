//! Integration tests for `scadsets init` and `scadsets enumerate`.

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn init_scaffolds_from_parameter_file() {
  let env = TestEnv::with_fixtures(&["cup.scad", "cup.json"]);

  env
    .cmd()
    .args(["init", "cup.json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Scaffolded configuration"))
    .stdout(predicate::str::contains("cup_(height)_(style)"));

  let config: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(env.path("cup.config.json")).unwrap()).unwrap();
  assert_eq!(config["set"]["height"], "-range");
  assert_eq!(config["variables"]["height"], "[40:20:80]");
  assert_eq!(config["set"]["style"], "-array");
  assert_eq!(config["variables"]["style"], serde_json::json!(["plain", "ribbed"]));
  assert_eq!(config["set"]["wall"], 2);
}

#[test]
fn scaffolded_configuration_builds() {
  let env = TestEnv::with_fixtures(&["cup.scad", "cup.json"]);

  env.cmd().args(["init", "cup.json"]).assert().success();
  env.cmd().args(["build", "cup.scad"]).assert().success();

  assert_eq!(env.renderer_calls().len(), 6);
  assert!(env.artifact("stl", "cup_80_ribbed").exists());
}

#[test]
fn init_refuses_to_overwrite() {
  let env = TestEnv::with_fixtures(&["cup.scad", "cup.json", "cup.config.json"]);

  env
    .cmd()
    .args(["init", "cup.json"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("file already exists"));

  env.cmd().args(["init", "cup.json", "--force"]).assert().success();
}

#[test]
fn init_without_model_source_warns() {
  let env = TestEnv::with_fixtures(&["cup.json"]);

  env
    .cmd()
    .args(["init", "cup.json", "-o", "draft.json"])
    .assert()
    .success()
    .stderr(predicate::str::contains("could not be classified"));

  assert!(env.path("draft.json").exists());
}

#[test]
fn init_rejects_empty_parameter_sets() {
  let env = TestEnv::with_fixtures(&[]);
  env.write_file("empty.json", r#"{ "fileFormatVersion": "1", "parameterSets": {} }"#);

  env
    .cmd()
    .args(["init", "empty.json"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("parameterSets must not be empty"));
}

#[test]
fn enumerate_writes_parameter_sets() {
  let env = TestEnv::cup();

  env
    .cmd()
    .args(["enumerate", "-i", "cup.config.json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("6 parameter set(s)"));

  let sets: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(env.path("cup.sets.json")).unwrap()).unwrap();
  assert_eq!(sets["fileFormatVersion"], 1);
  assert_eq!(sets["count"], 6);
  assert_eq!(sets["parameterSets"]["cup_60_ribbed"]["height"], 60);
  assert_eq!(sets["parameterSets"]["cup_60_ribbed"]["wall"], 2);
  assert!(env.renderer_calls().is_empty());
}

#[test]
fn enumerate_reuses_existing_file_unless_forced() {
  let env = TestEnv::cup();
  env.write_file(
    "cup.sets.json",
    r#"{ "fileFormatVersion": 1, "parameterSets": { "handmade": { "height": 1 } }, "count": 1 }"#,
  );

  env
    .cmd()
    .args(["enumerate", "-i", "cup.config.json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("1 parameter set(s)"))
    .stdout(predicate::str::contains("reused"));

  env
    .cmd()
    .args(["enumerate", "-i", "cup.config.json", "-f"])
    .assert()
    .success()
    .stdout(predicate::str::contains("6 parameter set(s)"));
}

#[test]
fn enumerate_rejects_bad_range() {
  let env = TestEnv::cup();
  env.write_file(
    "bad.config.json",
    r#"{ "set_name": "x_(a)", "set": { "a": "-range", "b": 1 }, "variables": { "a": "10:1:0" } }"#,
  );

  env
    .cmd()
    .args(["enumerate", "-i", "bad.config.json"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid variable"));

  assert!(!env.path("bad.sets.json").exists());
}
