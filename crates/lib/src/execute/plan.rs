//! Missing-artifact planning.

use indexmap::IndexSet;
use tracing::{debug, warn};

use super::types::{ArtifactKind, BuildOptions, OutputLayout};
use crate::version::EnumerationResult;

/// Parameter sets whose artifacts need rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPlan {
  /// Sets needing a preview image, in enumeration order.
  pub images: Vec<String>,
  /// Sets needing a solid model, in enumeration order.
  pub models: Vec<String>,
  /// Requested sets that are not in the enumeration.
  pub unknown: Vec<String>,
}

impl JobPlan {
  pub fn is_empty(&self) -> bool {
    self.images.is_empty() && self.models.is_empty()
  }

  pub fn len(&self) -> usize {
    self.images.len() + self.models.len()
  }

  pub fn names(&self, kind: ArtifactKind) -> &[String] {
    match kind {
      ArtifactKind::Image => &self.images,
      ArtifactKind::Model => &self.models,
    }
  }
}

/// Work out which artifacts are missing.
///
/// Only sets named in `options.sets` are considered when it is non-empty;
/// requested names missing from `result` are reported in `unknown`. An image
/// is missing when images are enabled and the file is absent or `force` is
/// set; a model is missing when the file is absent or `force` is set.
///
/// The whole scan happens here, before anything is dispatched.
pub fn plan_jobs(result: &EnumerationResult, layout: &OutputLayout, options: &BuildOptions) -> JobPlan {
  let requested: IndexSet<&str> = options.sets.iter().map(String::as_str).collect();

  let unknown: Vec<String> = requested
    .iter()
    .filter(|name| !result.contains(name))
    .map(|name| name.to_string())
    .collect();
  for name in &unknown {
    warn!(set = %name, "requested parameter set does not exist");
  }

  let mut plan = JobPlan {
    unknown,
    ..JobPlan::default()
  };

  let selected = result
    .names()
    .filter(|name| requested.is_empty() || requested.contains(name));

  for name in selected {
    if options.images && (options.force || !layout.artifact_path(ArtifactKind::Image, name).exists()) {
      plan.images.push(name.to_string());
    }
    if options.force || !layout.artifact_path(ArtifactKind::Model, name).exists() {
      plan.models.push(name.to_string());
    }
  }

  debug!(
    images = plan.images.len(),
    models = plan.models.len(),
    unknown = plan.unknown.len(),
    "planned render jobs"
  );
  plan
}
