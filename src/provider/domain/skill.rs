//! Provider skills.

use super::{ParseProficiencyLevelError, ProviderId};
use crate::service_type::ServiceTypeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How well a provider performs a service type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyLevel {
    /// Learning the trade.
    Beginner,
    /// Works unsupervised.
    #[default]
    Intermediate,
    /// Handles complex jobs.
    Expert,
}

impl ProficiencyLevel {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProficiencyLevel {
    type Error = ParseProficiencyLevelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "expert" => Ok(Self::Expert),
            _ => Err(ParseProficiencyLevelError(value.to_owned())),
        }
    }
}

/// Association between a provider and a service type it can perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSkill {
    provider_id: ProviderId,
    service_type_id: ServiceTypeId,
    proficiency: ProficiencyLevel,
    created_at: DateTime<Utc>,
}

impl ProviderSkill {
    /// Creates a skill row.
    #[must_use]
    pub const fn new(
        provider_id: ProviderId,
        service_type_id: ServiceTypeId,
        proficiency: ProficiencyLevel,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            provider_id,
            service_type_id,
            proficiency,
            created_at,
        }
    }

    /// Returns the provider.
    #[must_use]
    pub const fn provider_id(&self) -> ProviderId {
        self.provider_id
    }

    /// Returns the service type.
    #[must_use]
    pub const fn service_type_id(&self) -> ServiceTypeId {
        self.service_type_id
    }

    /// Returns the proficiency level.
    #[must_use]
    pub const fn proficiency(&self) -> ProficiencyLevel {
        self.proficiency
    }

    /// Returns when the skill was recorded.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
