//! Implementation of the `scadsets plan` command.
//!
//! Reports which artifacts a build would render. Nothing is written: when the
//! parameter-set file does not exist yet, the configuration is enumerated in
//! memory.

use anyhow::{Context, Result};
use serde::Serialize;

use scadsets_lib::execute::{BuildPlan, plan_build};

use super::BuildArgs;
use crate::output::{OutputFormat, print_artifact, print_info, print_json, print_stat, print_warning};

#[derive(Debug, Serialize)]
struct PlanOutput<'a> {
  cache: &'a std::path::Path,
  cache_status: &'static str,
  images: &'a [String],
  models: &'a [String],
  unknown_sets: &'a [String],
  commands: Vec<String>,
}

pub fn cmd_plan(args: &BuildArgs, verbose: bool, output: OutputFormat) -> Result<()> {
  let target = args.target.target();
  let plan = plan_build(&target, &args.options()).context("Plan failed")?;

  if output.is_json() {
    return print_json(&PlanOutput {
      cache: &plan.cache_path,
      cache_status: plan.cache_status.as_str(),
      images: &plan.jobs.images,
      models: &plan.jobs.models,
      unknown_sets: &plan.jobs.unknown,
      commands: plan.commands.iter().map(ToString::to_string).collect(),
    });
  }

  print_plan(&plan, verbose);
  Ok(())
}

fn print_plan(plan: &BuildPlan, verbose: bool) {
  for name in &plan.jobs.unknown {
    print_warning(&format!("Unknown parameter set: {}", name));
  }

  if plan.jobs.is_empty() {
    print_info("Nothing to render");
  } else {
    print_info(&format!(
      "Would render {} image(s) and {} model(s)",
      plan.jobs.images.len(),
      plan.jobs.models.len()
    ));
    for command in &plan.commands {
      print_artifact(&command.name, command.output());
      if verbose {
        println!("      {}", command);
      }
    }
  }

  print_stat(
    "Parameter sets",
    &format!("{} ({})", plan.cache_path.display(), plan.cache_status.as_str()),
  );
}
