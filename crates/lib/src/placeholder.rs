//! Name-template parsing and substitution.
//!
//! Parameter sets are named by substituting their values into a template such
//! as `model_(size)_(color)`. Every `(name)` token is a placeholder; the token
//! ends at the first `)` and may not span a line break. A `(` with no matching
//! `)` on the same line is literal text.
//!
//! Substituted values are sanitized: every byte outside `[A-Za-z0-9]` becomes
//! `-`, so a multi-byte character turns into several dashes.
//!
//! # Example
//!
//! ```
//! use scadsets_lib::placeholder::{parse, Segment};
//!
//! let segments = parse("box_(w)x(h)");
//! assert_eq!(segments, vec![
//!     Segment::Literal("box_".to_string()),
//!     Segment::Placeholder("w".to_string()),
//!     Segment::Literal("x".to_string()),
//!     Segment::Placeholder("h".to_string()),
//! ]);
//! ```

use crate::set::ParameterSet;

/// A segment of a parsed name template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text, copied as-is.
  Literal(String),

  /// `(name)`: replaced with the sanitized value of variable `name`.
  Placeholder(String),
}

/// Split a template into literal and placeholder segments.
pub fn parse(template: &str) -> Vec<Segment> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut rest = template;

  while let Some(open) = rest.find('(') {
    let after = &rest[open + 1..];

    match after.find([')', '\n']) {
      Some(close) if after.as_bytes()[close] == b')' => {
        literal.push_str(&rest[..open]);
        if !literal.is_empty() {
          segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Placeholder(after[..close].to_string()));
        rest = &after[close + 1..];
      }
      _ => {
        // No closing paren on this line: keep the '(' and keep scanning.
        literal.push_str(&rest[..=open]);
        rest = after;
      }
    }
  }

  literal.push_str(rest);
  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  segments
}

/// Names of all placeholders in the template, in order, duplicates included.
pub fn placeholders(template: &str) -> Vec<String> {
  parse(template)
    .into_iter()
    .filter_map(|segment| match segment {
      Segment::Placeholder(name) => Some(name),
      Segment::Literal(_) => None,
    })
    .collect()
}

/// Replace every byte outside `[A-Za-z0-9]` with `-`.
pub fn sanitize(fragment: &str) -> String {
  fragment
    .bytes()
    .map(|b| if b.is_ascii_alphanumeric() { b as char } else { '-' })
    .collect()
}

/// Substitute placeholders using `lookup`. Unknown names resolve to an empty string.
pub fn substitute<F>(segments: &[Segment], lookup: F) -> String
where
  F: Fn(&str) -> Option<String>,
{
  let mut out = String::new();
  for segment in segments {
    match segment {
      Segment::Literal(text) => out.push_str(text),
      Segment::Placeholder(name) => out.push_str(&sanitize(&lookup(name).unwrap_or_default())),
    }
  }
  out
}

/// A parsed name template, reusable across every parameter set of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate {
  segments: Vec<Segment>,
  placeholder_count: usize,
}

impl NameTemplate {
  pub fn parse(template: &str) -> Self {
    let segments = parse(template);
    let placeholder_count = segments
      .iter()
      .filter(|segment| matches!(segment, Segment::Placeholder(_)))
      .count();
    Self {
      segments,
      placeholder_count,
    }
  }

  pub fn segments(&self) -> &[Segment] {
    &self.segments
  }

  pub fn placeholder_count(&self) -> usize {
    self.placeholder_count
  }

  /// Render the name of a parameter set.
  ///
  /// Returns `None` when the set holds no more values than the template has
  /// placeholders; such sets are dropped from the enumeration. In particular a
  /// template with as many placeholders as variables drops every set.
  pub fn render(&self, set: &ParameterSet) -> Option<String> {
    if set.len() <= self.placeholder_count {
      return None;
    }
    Some(substitute(&self.segments, |name| set.get(name).map(ToString::to_string)))
  }
}

/// Parse `template` and render the name of `set` in one step.
///
/// See [`NameTemplate::render`] for when a set is dropped.
pub fn render_name(template: &str, set: &ParameterSet) -> Option<String> {
  NameTemplate::parse(template).render(set)
}
