//! Validation error types.

use thiserror::Error;

/// A single rule failure, independent of the field it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    /// The value is missing or blank.
    #[error("is required")]
    Required,

    /// The value is shorter than the minimum length.
    #[error("must be at least {min} characters")]
    TooShort {
        /// Minimum number of characters.
        min: usize,
    },

    /// The value is longer than the maximum length.
    #[error("must be at most {max} characters")]
    TooLong {
        /// Maximum number of characters.
        max: usize,
    },

    /// The value is not a plausible email address.
    #[error("must be a valid email address")]
    InvalidEmail,

    /// The value contains characters not allowed in phone numbers.
    #[error("may only contain digits, spaces, '+', '-', '(' and ')'")]
    InvalidPhoneCharacters,

    /// The value contains characters not allowed in slugs.
    #[error("may only contain lowercase letters, digits and '-'")]
    InvalidSlugCharacters,

    /// The value is not a member of a closed enumeration.
    #[error("must be one of: {}", .allowed.join(", "))]
    NotMember {
        /// Accepted values.
        allowed: &'static [&'static str],
    },

    /// The value lies outside a numeric range.
    #[error("must be between {min} and {max}")]
    OutOfRange {
        /// Inclusive lower bound.
        min: &'static str,
        /// Inclusive upper bound.
        max: &'static str,
    },

    /// The value is not a well-formed identifier.
    #[error("must be a valid identifier")]
    InvalidIdentifier,

    /// The value belongs to a different vocabulary than the current one.
    #[error("must be one of the {vocabulary} values: {}", .allowed.join(", "))]
    WrongVocabulary {
        /// Name of the vocabulary in use.
        vocabulary: &'static str,
        /// Values accepted in that vocabulary.
        allowed: &'static [&'static str],
    },
}

/// A rule failure attached to a named input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    field: &'static str,
    violation: RuleViolation,
}

impl FieldViolation {
    /// Creates a field violation.
    #[must_use]
    pub const fn new(field: &'static str, violation: RuleViolation) -> Self {
        Self { field, violation }
    }

    /// Returns the input field name.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the rule that failed.
    #[must_use]
    pub const fn violation(&self) -> &RuleViolation {
        &self.violation
    }

    /// Returns a display message for the field.
    #[must_use]
    pub fn message(&self) -> String {
        format!("{} {}", self.field, self.violation)
    }
}

/// Aggregated validation failure listing every violated field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", format_violations(.violations))]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(FieldViolation::message)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Creates an aggregate from collected violations.
    #[must_use]
    pub const fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// Creates an aggregate holding one violation.
    #[must_use]
    pub fn single(field: &'static str, violation: RuleViolation) -> Self {
        Self::new(vec![FieldViolation::new(field, violation)])
    }

    /// Returns all violations in the order they were recorded.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns `true` when the named field has at least one violation.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|entry| entry.field == field)
    }

    /// Returns the number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` when no violation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}
