//! Schema-level input validation.
//!
//! Rules are pure functions over raw input ([`rules`]); validated values are
//! carried in newtypes ([`values`]) so that downstream code cannot receive an
//! unchecked string. Callers collect every rule outcome into a
//! [`ValidationReport`] and receive one aggregated [`ValidationErrors`]
//! listing all violated fields rather than only the first.

mod error;
mod report;
pub mod rules;
mod values;

pub use error::{FieldViolation, RuleViolation, ValidationErrors};
pub use report::ValidationReport;
pub use values::{
    EmailAddress, OrganizationSlug, PersonName, PhoneNumber, ProblemDescription, SourceLabel,
    StreetAddress,
};
