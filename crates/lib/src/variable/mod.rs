//! Parameter variables.
//!
//! A variable is a named, ordered, finite source of values. There are three kinds:
//! - `Fixed`: a single value, occupying a digit of radix 1 in the enumeration
//! - `List`: an explicit ordered list of values
//! - `Range`: an arithmetic sequence described by `start:step:end`
//!
//! Variables are built once from a configuration document by [`Variable::from_spec`]
//! and are immutable afterwards.

mod range;
mod types;

pub use range::RangeSpec;
pub use types::{Value, VariableError};

/// The tag attached to a variable in the `set` section of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableTag {
  /// `-range`: the payload is a `start:step:end` string.
  Range,
  /// `-array`: the payload is a list of values.
  Array,
  /// Anything else. The payload's own shape decides the kind.
  Untagged,
}

impl VariableTag {
  /// Classify a raw `set` entry.
  pub fn from_json(raw: &serde_json::Value) -> Self {
    match raw.as_str().map(str::trim) {
      Some("-range") | Some("range") => VariableTag::Range,
      Some("-array") | Some("array") => VariableTag::Array,
      _ => VariableTag::Untagged,
    }
  }
}

/// The values held by a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableKind {
  Fixed(Value),
  List(Vec<Value>),
  Range { spec: RangeSpec, values: Vec<Value> },
}

/// A named source of parameter values.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
  name: String,
  kind: VariableKind,
}

impl Variable {
  /// A variable that always yields `value`.
  pub fn fixed(name: impl Into<String>, value: Value) -> Self {
    Self {
      name: name.into(),
      kind: VariableKind::Fixed(value),
    }
  }

  /// A variable over an explicit list. Numeric strings are normalized to numbers.
  pub fn list(name: impl Into<String>, values: Vec<Value>) -> Self {
    Self {
      name: name.into(),
      kind: VariableKind::List(values.into_iter().map(Value::normalized).collect()),
    }
  }

  /// A variable over a numeric range.
  ///
  /// # Errors
  ///
  /// Fails if `spec` is not a valid range (see [`RangeSpec::parse`]).
  pub fn range(name: impl Into<String>, spec: &str) -> Result<Self, VariableError> {
    let spec = RangeSpec::parse(spec)?;
    Ok(Self {
      name: name.into(),
      kind: VariableKind::Range {
        values: spec.values(),
        spec,
      },
    })
  }

  /// Build a variable from a tagged configuration entry.
  ///
  /// - `-range` with a string containing `:` → `Range`
  /// - `-array` with a list → `List`
  /// - untagged with a list → `List`
  /// - untagged with a scalar → `Fixed`
  ///
  /// A `-range` or `-array` tag whose payload has the wrong shape is an error
  /// rather than being reinterpreted.
  pub fn from_spec(name: &str, tag: &serde_json::Value, payload: &serde_json::Value) -> Result<Self, VariableError> {
    match (VariableTag::from_json(tag), payload) {
      (VariableTag::Range, serde_json::Value::String(spec)) if spec.contains(':') => Self::range(name, spec),
      (VariableTag::Range, _) => Err(VariableError::TagMismatch {
        name: name.to_string(),
        tag: "-range",
        expected: "a 'start:step:end' string",
      }),
      (VariableTag::Array, serde_json::Value::Array(items)) | (VariableTag::Untagged, serde_json::Value::Array(items)) => {
        let values = items
          .iter()
          .map(|item| Value::from_json(name, item))
          .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::list(name, values))
      }
      (VariableTag::Array, _) => Err(VariableError::TagMismatch {
        name: name.to_string(),
        tag: "-array",
        expected: "a list",
      }),
      (VariableTag::Untagged, scalar) => Ok(Self::fixed(name, Value::from_json(name, scalar)?)),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn kind(&self) -> &VariableKind {
    &self.kind
  }

  /// Number of distinct values this variable can take.
  pub fn count(&self) -> usize {
    match &self.kind {
      VariableKind::Fixed(_) => 1,
      VariableKind::List(values) => values.len(),
      VariableKind::Range { values, .. } => values.len(),
    }
  }

  /// The value at `index`.
  ///
  /// `Fixed` ignores the index. `List` and `Range` fail with `OutOfRange` when
  /// `index >= count()`.
  pub fn value_at(&self, index: usize) -> Result<&Value, VariableError> {
    let values = match &self.kind {
      VariableKind::Fixed(value) => return Ok(value),
      VariableKind::List(values) => values,
      VariableKind::Range { values, .. } => values,
    };

    values.get(index).ok_or_else(|| VariableError::OutOfRange {
      name: self.name.clone(),
      index,
      count: values.len(),
    })
  }
}
