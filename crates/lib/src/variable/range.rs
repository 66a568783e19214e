//! Numeric range specifications (`start:step:end` / `start:end`).

use std::fmt;
use std::str::FromStr;

use super::types::{Value, VariableError};

/// Tolerance used when deciding whether `end` is reachable from `start` in whole steps.
const REACH_EPSILON: f64 = 1e-9;

/// Decimal places kept on generated float values, to drop accumulated rounding noise.
const VALUE_SCALE: f64 = 1e9;

/// Upper bound on the number of values a single range may produce.
pub const MAX_RANGE_VALUES: usize = 1_000_000;

/// A validated arithmetic range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSpec {
  pub start: f64,
  pub step: f64,
  pub end: f64,
}

impl RangeSpec {
  /// Parse a range specification.
  ///
  /// Accepts `start:step:end` or `start:end` (step defaults to 1). Surrounding
  /// brackets (`[]`, `{}`, `()`) and whitespace are ignored, so the customizer
  /// comment form `[0:2:10]` parses too.
  ///
  /// # Errors
  ///
  /// - `MalformedRange` if the text does not have two or three numeric components
  /// - `NonPositiveStep` if `step <= 0`
  /// - `InvertedBounds` if `start > end`
  /// - `StepExceedsSpan` if `step > end - start`
  /// - `TooManyValues` if the range would produce more than [`MAX_RANGE_VALUES`] values
  pub fn parse(spec: &str) -> Result<Self, VariableError> {
    let inner = spec
      .trim()
      .trim_matches(|c| matches!(c, '[' | ']' | '{' | '}' | '(' | ')'))
      .trim();

    let parts: Vec<&str> = inner.split(':').collect();
    let malformed = |reason: String| VariableError::MalformedRange {
      spec: spec.to_string(),
      reason,
    };

    let numbers = parts
      .iter()
      .map(|part| {
        part
          .trim()
          .parse::<f64>()
          .ok()
          .filter(|n| n.is_finite())
          .ok_or_else(|| malformed(format!("'{}' is not a number", part.trim())))
      })
      .collect::<Result<Vec<f64>, _>>();

    let (start, step, end) = match parts.len() {
      2 => {
        let numbers = numbers?;
        (numbers[0], 1.0, numbers[1])
      }
      3 => {
        let numbers = numbers?;
        (numbers[0], numbers[1], numbers[2])
      }
      n => {
        return Err(malformed(format!(
          "expected start:step:end or start:end, got {} component(s)",
          n
        )));
      }
    };

    Self::new(start, step, end).map_err(|e| match e {
      VariableError::NonPositiveStep { .. } => VariableError::NonPositiveStep { spec: spec.to_string() },
      VariableError::InvertedBounds { .. } => VariableError::InvertedBounds { spec: spec.to_string() },
      VariableError::StepExceedsSpan { .. } => VariableError::StepExceedsSpan { spec: spec.to_string() },
      VariableError::TooManyValues { limit, .. } => VariableError::TooManyValues {
        spec: spec.to_string(),
        limit,
      },
      other => other,
    })
  }

  /// Build a range from its components, enforcing `step > 0`, `start <= end`,
  /// `step <= end - start` and a value count of at most [`MAX_RANGE_VALUES`].
  pub fn new(start: f64, step: f64, end: f64) -> Result<Self, VariableError> {
    let spec = Self { start, step, end };

    // `!(step > 0.0)` also rejects NaN.
    if !(step > 0.0) {
      return Err(VariableError::NonPositiveStep { spec: spec.to_string() });
    }
    if start > end {
      return Err(VariableError::InvertedBounds { spec: spec.to_string() });
    }
    if step > end - start {
      return Err(VariableError::StepExceedsSpan { spec: spec.to_string() });
    }

    // Whole steps between start and end. Infinite when step underflows the span.
    let steps = ((end - start) / step + REACH_EPSILON).floor();
    if !steps.is_finite() || steps >= MAX_RANGE_VALUES as f64 {
      return Err(VariableError::TooManyValues {
        spec: spec.to_string(),
        limit: MAX_RANGE_VALUES,
      });
    }

    Ok(spec)
  }

  /// Number of values in the range, including `end` when it is reachable.
  pub fn len(&self) -> usize {
    let steps = ((self.end - self.start) / self.step + REACH_EPSILON).floor();
    (steps as usize).saturating_add(1).min(MAX_RANGE_VALUES)
  }

  /// A validated range always holds at least `start` and `start + step`.
  pub fn is_empty(&self) -> bool {
    false
  }

  /// Materialize every value of the range.
  ///
  /// Values are computed as `start + k * step` rather than by repeated addition.
  /// When both `start` and `step` are whole numbers the values are integers,
  /// unless a value does not fit in an `i64`.
  pub fn values(&self) -> Vec<Value> {
    (0..self.len()).map(|k| self.value(k)).collect()
  }

  fn value(&self, k: usize) -> Value {
    if let Some(int) = self.int_value(k) {
      return Value::Int(int);
    }
    let raw = self.start + k as f64 * self.step;
    let scaled = raw * VALUE_SCALE;
    // Beyond 2^53 every float is already whole, so there is no noise to drop.
    if scaled.abs() < 9_007_199_254_740_992.0 {
      Value::Float(scaled.round() / VALUE_SCALE)
    } else {
      Value::Float(raw)
    }
  }

  fn int_value(&self, k: usize) -> Option<i64> {
    let start = whole(self.start)?;
    let step = whole(self.step)?;
    i64::try_from(k).ok()?.checked_mul(step)?.checked_add(start)
  }
}

/// `n` as an `i64`, if it is a whole number inside the `i64` range.
fn whole(n: f64) -> Option<i64> {
  // 2^63 is exactly representable; anything at or above it does not fit.
  const LIMIT: f64 = 9_223_372_036_854_775_808.0;
  (n.fract() == 0.0 && n >= -LIMIT && n < LIMIT).then_some(n as i64)
}

impl fmt::Display for RangeSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.start, self.step, self.end)
  }
}

impl FromStr for RangeSpec {
  type Err = VariableError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}
