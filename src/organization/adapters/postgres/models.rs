//! Diesel row models for organizations.

use super::schema::organizations;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for organizations.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = organizations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrganizationRow {
    /// Organization identifier.
    pub id: uuid::Uuid,
    /// Unique URL slug.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for organizations.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = organizations)]
pub struct NewOrganizationRow {
    /// Organization identifier.
    pub id: uuid::Uuid,
    /// Unique URL slug.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
