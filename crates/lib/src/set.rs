//! Combinatorial parameter spaces.
//!
//! A [`ParameterSpace`] is an ordered list of variables. Each linear index in
//! `0..number_of_sets()` maps to exactly one combination through mixed-radix
//! decomposition: every variable is a digit whose radix is its own `count()`,
//! and the first variable inserted cycles fastest.
//!
//! ```
//! use scadsets_lib::set::ParameterSpace;
//! use scadsets_lib::variable::{Value, Variable};
//!
//! let mut space = ParameterSpace::new();
//! space.add_variable(Variable::list("a", vec![Value::Int(0), Value::Int(1)]));
//! space.add_variable(Variable::list("b", vec![Value::from("x"), Value::from("y")]));
//!
//! assert_eq!(space.number_of_sets(), 4);
//! assert_eq!(space.get_set(1).unwrap()["a"], Value::Int(1));
//! assert_eq!(space.get_set(1).unwrap()["b"], Value::from("x"));
//! ```

use indexmap::IndexMap;

use crate::variable::{Value, Variable, VariableError};

/// One concrete assignment of a value to every variable, in variable order.
pub type ParameterSet = IndexMap<String, Value>;

/// An ordered collection of variables forming a combinatorial space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSpace {
  variables: Vec<Variable>,
  attributes: Vec<String>,
}

impl ParameterSpace {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a variable. Its name is recorded as an attribute.
  ///
  /// Insertion order defines digit order: earlier variables cycle faster.
  pub fn add_variable(&mut self, variable: Variable) -> &mut Self {
    self.attributes.push(variable.name().to_string());
    self.variables.push(variable);
    self
  }

  pub fn variables(&self) -> &[Variable] {
    &self.variables
  }

  /// Variable names in insertion order.
  pub fn attributes(&self) -> &[String] {
    &self.attributes
  }

  pub fn is_empty(&self) -> bool {
    self.variables.is_empty()
  }

  /// Total number of combinations.
  ///
  /// An empty space has exactly one (empty) combination. A space containing a
  /// variable with no values has none. Saturates at `usize::MAX`; use
  /// [`checked_number_of_sets`](Self::checked_number_of_sets) to detect that.
  pub fn number_of_sets(&self) -> usize {
    self.checked_number_of_sets().unwrap_or(usize::MAX)
  }

  /// Total number of combinations, or `None` if it does not fit in a `usize`.
  pub fn checked_number_of_sets(&self) -> Option<usize> {
    if self.variables.is_empty() {
      return Some(1);
    }
    self
      .variables
      .iter()
      .try_fold(1usize, |total, variable| total.checked_mul(variable.count()))
  }

  /// The combination at `index`.
  ///
  /// # Errors
  ///
  /// Returns `OutOfRange` when `index >= number_of_sets()`. The error names the
  /// slowest-cycling variable, whose digit is the one that overflows.
  pub fn get_set(&self, index: usize) -> Result<ParameterSet, VariableError> {
    let total = self.number_of_sets();
    if index >= total {
      return Err(VariableError::OutOfRange {
        name: self.attributes.last().cloned().unwrap_or_default(),
        index,
        count: total,
      });
    }

    let mut set = ParameterSet::with_capacity(self.variables.len());
    let mut multiplier = 1usize;

    for variable in &self.variables {
      let count = variable.count();
      let digit = (index / multiplier) % count;
      set.insert(variable.name().to_string(), variable.value_at(digit)?.clone());
      multiplier = multiplier.saturating_mul(count);
    }

    Ok(set)
  }

  /// Iterate over every combination in index order.
  pub fn iter(&self) -> impl Iterator<Item = ParameterSet> + '_ {
    (0..self.number_of_sets()).filter_map(|index| self.get_set(index).ok())
  }
}
