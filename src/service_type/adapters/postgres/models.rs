//! Diesel row models for service types.

use super::schema::service_types;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for service types.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = service_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ServiceTypeRow {
    /// Service type identifier.
    pub id: uuid::Uuid,
    /// Owning organization.
    pub organization_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for service types.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = service_types)]
pub struct NewServiceTypeRow {
    /// Service type identifier.
    pub id: uuid::Uuid,
    /// Owning organization.
    pub organization_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
