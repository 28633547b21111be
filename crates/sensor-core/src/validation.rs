//! Table-driven field validation for inbound payloads
//!
//! Each input type declares a static table of [`FieldRule`]s: the dotted field
//! path, an accessor that projects the field into a [`FieldValue`], and the
//! [`Rule`] it must satisfy. [`validate_fields`] evaluates the table and
//! collects every violated field. Rules on a nested path (`location.latitude`)
//! are skipped once their parent (`location`) has already failed.

use std::fmt;

/// A field projected out of a payload for checking
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Present,
    Text(&'a str),
    Number(f64),
    Integer(i64),
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(FieldValue::Missing, FieldValue::Text)
    }
}

impl From<Option<f64>> for FieldValue<'_> {
    fn from(value: Option<f64>) -> Self {
        value.map_or(FieldValue::Missing, FieldValue::Number)
    }
}

impl From<Option<i64>> for FieldValue<'_> {
    fn from(value: Option<i64>) -> Self {
        value.map_or(FieldValue::Missing, FieldValue::Integer)
    }
}

/// Predicate a field must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present, and non-empty for text
    Required,
    /// A number that is neither NaN nor infinite (missing passes)
    Finite,
    /// An integer greater than zero (missing passes)
    Positive,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Finite => "finite",
            Rule::Positive => "positive",
        }
    }

    fn check(&self, value: FieldValue<'_>) -> bool {
        match (self, value) {
            (Rule::Required, FieldValue::Missing) => false,
            (Rule::Required, FieldValue::Text(text)) => !text.is_empty(),
            (Rule::Required, _) => true,
            (Rule::Finite, FieldValue::Number(n)) => n.is_finite(),
            (Rule::Finite, _) => true,
            (Rule::Positive, FieldValue::Integer(n)) => n > 0,
            (Rule::Positive, _) => true,
        }
    }
}

/// One row of a validation table
pub struct FieldRule<T> {
    pub field: &'static str,
    pub rule: Rule,
    pub value: for<'a> fn(&'a T) -> FieldValue<'a>,
}

/// A single failed field check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub rule: Rule,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}' failed on the '{}' rule", self.field, self.rule.name())
    }
}

/// Every violation found in one payload, in table order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Dotted paths of the violated fields
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Types that carry their own validation table
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Evaluate `rules` against `value`, collecting all violations
pub fn validate_fields<T>(value: &T, rules: &[FieldRule<T>]) -> Result<(), ValidationErrors> {
    let mut violations: Vec<Violation> = Vec::new();

    for rule in rules {
        let parent_failed = violations.iter().any(|v| {
            rule.field.len() > v.field.len()
                && rule.field.starts_with(v.field)
                && rule.field.as_bytes()[v.field.len()] == b'.'
        });
        if parent_failed {
            continue;
        }

        if !rule.rule.check((rule.value)(value)) {
            violations.push(Violation { field: rule.field, rule: rule.rule });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { violations })
    }
}
