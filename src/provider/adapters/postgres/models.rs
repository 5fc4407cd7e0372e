//! Diesel row models for providers and skills.

use super::schema::{provider_skills, service_providers};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for providers.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = service_providers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProviderRow {
    /// Provider identifier.
    pub id: uuid::Uuid,
    /// Owning organization.
    pub organization_id: uuid::Uuid,
    /// Provider name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Rating.
    pub rating: f64,
    /// Completed job counter.
    pub total_jobs_completed: i64,
    /// Status.
    pub status: String,
    /// Optimistic concurrency version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insert and full-update model for providers.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = service_providers)]
#[diesel(treat_none_as_null = true)]
pub struct ProviderRecord {
    /// Provider identifier.
    pub id: uuid::Uuid,
    /// Owning organization.
    pub organization_id: uuid::Uuid,
    /// Provider name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Rating.
    pub rating: f64,
    /// Completed job counter.
    pub total_jobs_completed: i64,
    /// Status.
    pub status: String,
    /// Optimistic concurrency version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Query and insert row for provider skills.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = provider_skills)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProviderSkillRow {
    /// Provider.
    pub provider_id: uuid::Uuid,
    /// Service type.
    pub service_type_id: uuid::Uuid,
    /// Proficiency level.
    pub proficiency_level: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
