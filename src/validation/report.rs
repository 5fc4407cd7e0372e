//! Collector that records every rule outcome before failing.

use super::{FieldViolation, RuleViolation, ValidationErrors};

/// Accumulates rule outcomes across all fields of an input.
///
/// # Examples
///
/// ```
/// use fieldline::validation::{PersonName, StreetAddress, ValidationReport};
///
/// let mut report = ValidationReport::new();
/// let name = report.check("customer_name", PersonName::parse("J"));
/// let address = report.check("address", StreetAddress::parse(""));
///
/// assert!(name.is_none() && address.is_none());
/// let errors = report.into_errors();
/// assert!(errors.has_field("customer_name"));
/// assert!(errors.has_field("address"));
/// ```
#[derive(Debug, Default)]
pub struct ValidationReport {
    violations: Vec<FieldViolation>,
}

impl ValidationReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of a rule, returning the value when it passed.
    pub fn check<T>(&mut self, field: &'static str, outcome: Result<T, RuleViolation>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(violation) => {
                self.reject(field, violation);
                None
            }
        }
    }

    /// Records a violation directly.
    pub fn reject(&mut self, field: &'static str, violation: RuleViolation) {
        self.violations.push(FieldViolation::new(field, violation));
    }

    /// Returns `true` when no violation has been recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Consumes the report and returns the aggregated errors.
    #[must_use]
    pub fn into_errors(self) -> ValidationErrors {
        ValidationErrors::new(self.violations)
    }

    /// Consumes the report, failing when any violation was recorded.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every recorded violation.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(self.into_errors())
        }
    }
}
