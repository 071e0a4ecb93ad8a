//! Field-level validation primitives shared by every entity.

use std::fmt;

use serde::Serialize;

/// A single constraint a field value can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// The value is missing or blank.
    Required,
    /// The value is longer than `max` characters.
    TooLong { max: usize },
    /// The value is shorter than `min` characters.
    TooShort { min: usize },
    /// The value does not have the expected shape.
    InvalidFormat,
}

impl Rule {
    /// Stable machine-readable name.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::TooLong { .. } => "too_long",
            Self::TooShort { .. } => "too_short",
            Self::InvalidFormat => "invalid_format",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "must not be blank"),
            Self::TooLong { max } => write!(f, "must be at most {max} characters"),
            Self::TooShort { min } => write!(f, "must be at least {min} characters"),
            Self::InvalidFormat => write!(f, "has an invalid format"),
        }
    }
}

/// A rule violation attributed to a named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    #[serde(flatten)]
    pub rule: Rule,
}

impl FieldViolation {
    pub fn new(field: &'static str, rule: Rule) -> Self {
        Self { field, rule }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.rule)
    }
}

/// Every violation found on a record. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    /// Whether `field` failed any rule.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    /// The rule `field` failed, if any.
    pub fn rule_for(&self, field: &str) -> Option<Rule> {
        self.0.iter().find(|v| v.field == field).map(|v| v.rule)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{violation}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = FieldViolation;
    type IntoIter = std::vec::IntoIter<FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Collects violations across all fields of a record instead of stopping
/// at the first failure.
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<FieldViolation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one field check.
    pub fn check(&mut self, field: &'static str, outcome: Result<(), Rule>) -> &mut Self {
        if let Err(rule) = outcome {
            self.violations.push(FieldViolation::new(field, rule));
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.violations))
        }
    }
}

/// Character count, not byte length.
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Non-blank and at most `max` characters.
pub fn require_text(value: &str, max: usize) -> Result<(), Rule> {
    if value.trim().is_empty() {
        return Err(Rule::Required);
    }
    limit_text(value, max)
}

/// At most `max` characters; blank is allowed.
pub fn limit_text(value: &str, max: usize) -> Result<(), Rule> {
    if char_len(value) > max {
        return Err(Rule::TooLong { max });
    }
    Ok(())
}
