//! Validated value newtypes.

use super::{RuleViolation, rules};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! validated_text {
    ($(#[$meta:meta])* $name:ident, $rule:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Validates and wraps raw input.
            ///
            /// # Errors
            ///
            /// Returns the [`RuleViolation`] reported by the underlying rule.
            pub fn parse(value: &str) -> Result<Self, RuleViolation> {
                $rule(value).map(Self)
            }

            /// Returns the validated value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

macro_rules! optional_text {
    ($(#[$meta:meta])* $name:ident, $rule:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Validates optional raw input. Absent or blank input yields
            /// `Ok(None)`.
            ///
            /// # Errors
            ///
            /// Returns the [`RuleViolation`] reported by the underlying rule.
            pub fn parse(value: Option<&str>) -> Result<Option<Self>, RuleViolation> {
                $rule(value).map(|parsed| parsed.map(Self))
            }

            /// Returns the validated value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

validated_text!(
    /// A customer or provider name of 2 to 100 characters.
    PersonName,
    rules::name
);

validated_text!(
    /// A street address of 5 to 500 characters.
    StreetAddress,
    rules::address
);

validated_text!(
    /// A problem description of 10 to 5000 characters.
    ProblemDescription,
    rules::description
);

validated_text!(
    /// A URL-safe organization slug.
    OrganizationSlug,
    rules::slug
);

optional_text!(
    /// A plausible email address.
    EmailAddress,
    rules::optional_email
);

optional_text!(
    /// A phone number made of digits and common separators.
    PhoneNumber,
    rules::optional_phone
);

optional_text!(
    /// Free-text label recording where a request came from.
    SourceLabel,
    rules::optional_label
);

impl SourceLabel {
    /// Wraps a label produced by the system itself.
    #[must_use]
    pub fn system(label: &'static str) -> Self {
        Self(label.to_owned())
    }
}
