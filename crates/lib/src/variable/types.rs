//! Value and error types shared by all variable kinds.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single parameter value as it appears in the configuration and in the cache file.
///
/// Serializes untagged, so a `Value` is indistinguishable from the plain JSON
/// scalar (or array) it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
  Bool(bool),
  Int(i64),
  Float(f64),
  Text(String),
  List(Vec<Value>),
}

impl Value {
  /// Convert a raw JSON value from a configuration document.
  ///
  /// Objects and `null` have no meaning as a parameter value and are rejected.
  pub fn from_json(name: &str, raw: &serde_json::Value) -> Result<Self, VariableError> {
    match raw {
      serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
      serde_json::Value::Number(n) => match n.as_i64() {
        Some(i) => Ok(Value::Int(i)),
        None => Ok(Value::Float(n.as_f64().unwrap_or(f64::NAN))),
      },
      serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
      serde_json::Value::Array(items) => items
        .iter()
        .map(|item| Value::from_json(name, item))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List),
      serde_json::Value::Null => Err(VariableError::Unsupported {
        name: name.to_string(),
        kind: "null",
      }),
      serde_json::Value::Object(_) => Err(VariableError::Unsupported {
        name: name.to_string(),
        kind: "object",
      }),
    }
  }

  /// Turn numeric text into a number, leaving everything else untouched.
  ///
  /// `"10"` becomes `Int(10)`, `" 2.5 "` becomes `Float(2.5)`; `"inf"` and `"NaN"`
  /// stay text because they contain no digit.
  pub fn normalized(self) -> Self {
    let Value::Text(text) = &self else {
      return self;
    };
    let trimmed = text.trim();
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
      return self;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
      return Value::Int(i);
    }
    match trimmed.parse::<f64>() {
      Ok(f) if f.is_finite() => Value::Float(f),
      _ => self,
    }
  }
}

/// Renders the value the way it is substituted into a parameter-set name.
impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Bool(true) => write!(f, "1"),
      Value::Bool(false) => Ok(()),
      Value::Int(i) => write!(f, "{}", i),
      Value::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => write!(f, "{}", *x as i64),
      Value::Float(x) => write!(f, "{}", x),
      Value::Text(s) => write!(f, "{}", s),
      Value::List(items) => {
        for (idx, item) in items.iter().enumerate() {
          if idx > 0 {
            write!(f, ",")?;
          }
          write!(f, "{}", item)?;
        }
        Ok(())
      }
    }
  }
}

impl From<i64> for Value {
  fn from(value: i64) -> Self {
    Value::Int(value)
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Float(value)
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::Text(value.to_string())
  }
}

/// Errors raised while building or indexing variables.
///
/// Everything except `OutOfRange` is a configuration error detected at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VariableError {
  #[error("malformed range '{spec}': {reason}")]
  MalformedRange { spec: String, reason: String },

  #[error("range '{spec}': step must be greater than 0")]
  NonPositiveStep { spec: String },

  #[error("range '{spec}': start must be less than or equal to end")]
  InvertedBounds { spec: String },

  #[error("range '{spec}': step must be less than or equal to the span")]
  StepExceedsSpan { spec: String },

  #[error("range '{spec}': produces more than {limit} values")]
  TooManyValues { spec: String, limit: usize },

  #[error("variable '{name}' is tagged as {tag} but its value is not {expected}")]
  TagMismatch {
    name: String,
    tag: &'static str,
    expected: &'static str,
  },

  #[error("variable '{name}': unsupported value of type {kind}")]
  Unsupported { name: String, kind: &'static str },

  #[error("variable '{name}': index {index} out of range (count {count})")]
  OutOfRange { name: String, index: usize, count: usize },
}
