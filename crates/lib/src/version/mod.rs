//! Parameter-set enumeration.
//!
//! A [`Version`] is built from a [`VersionConfig`]: one variable per `set`
//! entry, in document order. Enumerating it walks every combination of the
//! resulting [`ParameterSpace`] and names each one by rendering the `set_name`
//! template. The named collection is persisted as a cache file (see [`cache`]).

pub mod cache;
mod types;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::placeholder::NameTemplate;
use crate::set::ParameterSpace;
use crate::variable::Variable;

pub use cache::{load_cache, load_or_enumerate, peek_enumeration, write_cache};
pub use types::{CacheStatus, EnumerationResult, FORMAT_VERSION, VersionConfig, VersionError};

/// A parameter space together with the template that names its combinations.
#[derive(Debug, Clone)]
pub struct Version {
  template: NameTemplate,
  set_name: String,
  space: ParameterSpace,
}

impl Version {
  /// Build the parameter space described by `config`.
  ///
  /// Each `set` entry becomes one variable. Its payload is the matching
  /// `variables` entry, or the `set` entry itself when there is none.
  ///
  /// # Errors
  ///
  /// Fails on the first variable that cannot be constructed (bad range bounds,
  /// tag/payload mismatch, unsupported value), and with `TooManySets` when the
  /// number of combinations does not fit in a `usize`.
  pub fn from_config(config: &VersionConfig) -> Result<Self, VersionError> {
    let mut space = ParameterSpace::new();

    for (name, tag) in &config.set {
      let payload = config.variables.get(name).unwrap_or(tag);
      let variable = Variable::from_spec(name, tag, payload)?;
      debug!(variable = %name, count = variable.count(), "added variable");
      space.add_variable(variable);
    }

    if space.checked_number_of_sets().is_none() {
      return Err(VersionError::TooManySets {
        variables: space.variables().len(),
      });
    }

    Ok(Self {
      template: NameTemplate::parse(&config.set_name),
      set_name: config.set_name.clone(),
      space,
    })
  }

  pub fn set_name(&self) -> &str {
    &self.set_name
  }

  pub fn space(&self) -> &ParameterSpace {
    &self.space
  }

  /// Enumerate and name every combination.
  ///
  /// Combinations whose name cannot be rendered (see
  /// [`NameTemplate::render`](crate::placeholder::NameTemplate::render)) are
  /// dropped. Combinations rendering to the same name collapse into one entry
  /// that keeps the first position and the last values.
  pub fn enumerate(&self) -> EnumerationResult {
    let total = self.space.number_of_sets();
    let mut named = IndexMap::new();
    let mut dropped = 0usize;

    for set in self.space.iter() {
      match self.template.render(&set) {
        Some(name) => {
          named.insert(name, set);
        }
        None => dropped += 1,
      }
    }

    if dropped > 0 {
      warn!(
        template = %self.set_name,
        dropped,
        placeholders = self.template.placeholder_count(),
        variables = self.space.variables().len(),
        "dropped parameter sets with no more values than template placeholders"
      );
    }

    let result = EnumerationResult::new(named);
    info!(combinations = total, named = result.count, "enumerated parameter sets");
    result
  }
}
