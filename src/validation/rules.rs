//! Individual validation rules.
//!
//! Each rule is a pure function over raw input. Rules trim surrounding
//! whitespace and return the normalized value on success. Optional rules
//! treat an absent or blank value as "not provided" rather than invalid.

use super::RuleViolation;
use uuid::Uuid;
use validator::{validate_email, validate_length};

/// Minimum length of person and business names.
pub const NAME_MIN_CHARS: usize = 2;
/// Maximum length of person and business names.
pub const NAME_MAX_CHARS: usize = 100;
/// Maximum length of email addresses.
pub const EMAIL_MAX_CHARS: usize = 255;
/// Minimum length of phone numbers.
pub const PHONE_MIN_CHARS: usize = 10;
/// Maximum length of phone numbers.
pub const PHONE_MAX_CHARS: usize = 32;
/// Minimum length of street addresses.
pub const ADDRESS_MIN_CHARS: usize = 5;
/// Maximum length of street addresses.
pub const ADDRESS_MAX_CHARS: usize = 500;
/// Minimum length of problem descriptions.
pub const DESCRIPTION_MIN_CHARS: usize = 10;
/// Maximum length of problem descriptions.
pub const DESCRIPTION_MAX_CHARS: usize = 5000;
/// Maximum length of organization slugs.
pub const SLUG_MAX_CHARS: usize = 100;
/// Maximum length of free-text labels such as request sources.
pub const LABEL_MAX_CHARS: usize = 100;

/// Validates a person or business name.
///
/// # Errors
///
/// Returns [`RuleViolation::Required`] for blank input, otherwise
/// [`RuleViolation::TooShort`] or [`RuleViolation::TooLong`].
pub fn name(value: &str) -> Result<String, RuleViolation> {
    bounded_text(value, NAME_MIN_CHARS, NAME_MAX_CHARS)
}

/// Validates a street address.
///
/// # Errors
///
/// Returns [`RuleViolation::Required`] for blank input, otherwise a length
/// violation.
pub fn address(value: &str) -> Result<String, RuleViolation> {
    bounded_text(value, ADDRESS_MIN_CHARS, ADDRESS_MAX_CHARS)
}

/// Validates a problem description.
///
/// # Errors
///
/// Returns [`RuleViolation::Required`] for blank input, otherwise a length
/// violation.
pub fn description(value: &str) -> Result<String, RuleViolation> {
    bounded_text(value, DESCRIPTION_MIN_CHARS, DESCRIPTION_MAX_CHARS)
}

/// Validates an optional email address.
///
/// Blank input is absent and yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`RuleViolation::TooLong`] or [`RuleViolation::InvalidEmail`].
pub fn optional_email(value: Option<&str>) -> Result<Option<String>, RuleViolation> {
    let Some(trimmed) = present(value) else {
        return Ok(None);
    };
    at_most(trimmed, EMAIL_MAX_CHARS)?;
    if !is_deliverable_email(trimmed) {
        return Err(RuleViolation::InvalidEmail);
    }
    Ok(Some(trimmed.to_owned()))
}

/// Validates an optional phone number.
///
/// Blank input is absent and yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`RuleViolation::InvalidPhoneCharacters`] or a length violation.
pub fn optional_phone(value: Option<&str>) -> Result<Option<String>, RuleViolation> {
    let Some(trimmed) = present(value) else {
        return Ok(None);
    };
    let allowed = |ch: char| ch.is_ascii_digit() || matches!(ch, '+' | '-' | '(' | ')' | ' ');
    if !trimmed.chars().all(allowed) {
        return Err(RuleViolation::InvalidPhoneCharacters);
    }
    at_least(trimmed, PHONE_MIN_CHARS)?;
    at_most(trimmed, PHONE_MAX_CHARS)?;
    Ok(Some(trimmed.to_owned()))
}

/// Validates an organization slug.
///
/// Slugs are not trimmed or lowercased: the stored form must match exactly.
///
/// # Errors
///
/// Returns [`RuleViolation::Required`], [`RuleViolation::TooLong`], or
/// [`RuleViolation::InvalidSlugCharacters`].
pub fn slug(value: &str) -> Result<String, RuleViolation> {
    if value.is_empty() {
        return Err(RuleViolation::Required);
    }
    at_most(value, SLUG_MAX_CHARS)?;
    let allowed = |ch: char| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-';
    if !value.chars().all(allowed) {
        return Err(RuleViolation::InvalidSlugCharacters);
    }
    Ok(value.to_owned())
}

/// Validates an optional free-text label.
///
/// # Errors
///
/// Returns [`RuleViolation::TooLong`] when the label exceeds
/// [`LABEL_MAX_CHARS`].
pub fn optional_label(value: Option<&str>) -> Result<Option<String>, RuleViolation> {
    let Some(trimmed) = present(value) else {
        return Ok(None);
    };
    at_most(trimmed, LABEL_MAX_CHARS)?;
    Ok(Some(trimmed.to_owned()))
}

/// Validates a provider rating on the 0.0 to 5.0 scale.
///
/// # Errors
///
/// Returns [`RuleViolation::OutOfRange`] for values outside the scale or
/// non-finite values.
pub fn rating(value: f64) -> Result<f64, RuleViolation> {
    if value.is_finite() && (0.0..=5.0).contains(&value) {
        Ok(value)
    } else {
        Err(RuleViolation::OutOfRange {
            min: "0.0",
            max: "5.0",
        })
    }
}

/// Parses a record identifier.
///
/// # Errors
///
/// Returns [`RuleViolation::Required`] for blank input and
/// [`RuleViolation::InvalidIdentifier`] for malformed UUIDs.
pub fn identifier(value: &str) -> Result<Uuid, RuleViolation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RuleViolation::Required);
    }
    Uuid::parse_str(trimmed).map_err(|_| RuleViolation::InvalidIdentifier)
}

/// Parses an optional record identifier; blank input is absent.
///
/// # Errors
///
/// Returns [`RuleViolation::InvalidIdentifier`] for malformed UUIDs.
pub fn optional_identifier(value: Option<&str>) -> Result<Option<Uuid>, RuleViolation> {
    present(value).map(identifier).transpose()
}

/// Parses a member of a closed enumeration. Unknown values are rejected,
/// never coerced.
///
/// # Errors
///
/// Returns [`RuleViolation::NotMember`] listing `allowed`.
pub fn member<T>(value: &str, allowed: &'static [&'static str]) -> Result<T, RuleViolation>
where
    T: for<'a> TryFrom<&'a str>,
{
    <T as TryFrom<&str>>::try_from(value).map_err(|_| RuleViolation::NotMember { allowed })
}

fn bounded_text(value: &str, min: usize, max: usize) -> Result<String, RuleViolation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RuleViolation::Required);
    }
    at_least(trimmed, min)?;
    at_most(trimmed, max)?;
    Ok(trimmed.to_owned())
}

fn at_least(value: &str, min: usize) -> Result<(), RuleViolation> {
    if validate_length(value, u64::try_from(min).ok(), None, None) {
        Ok(())
    } else {
        Err(RuleViolation::TooShort { min })
    }
}

fn at_most(value: &str, max: usize) -> Result<(), RuleViolation> {
    if validate_length(value, None, u64::try_from(max).ok(), None) {
        Ok(())
    } else {
        Err(RuleViolation::TooLong { max })
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

/// RFC 5322 syntax plus a dotted domain; bare hosts such as `localhost` are
/// not reachable addresses for customers.
fn is_deliverable_email(value: &str) -> bool {
    validate_email(value)
        && value
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'))
}
