//! Diesel row models for service requests.

use super::schema::service_requests;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for service requests.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = service_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ServiceRequestRow {
    /// Request identifier.
    pub id: uuid::Uuid,
    /// Owning organization.
    pub organization_id: uuid::Uuid,
    /// Customer name.
    pub customer_name: String,
    /// Customer email.
    pub customer_email: Option<String>,
    /// Customer phone.
    pub customer_phone: Option<String>,
    /// Service address.
    pub address: String,
    /// Problem description.
    pub problem_description: String,
    /// Requested service type.
    pub service_type_id: Option<uuid::Uuid>,
    /// Dispatch priority.
    pub priority: String,
    /// Origin label.
    pub source: Option<String>,
    /// Assigned provider.
    pub assigned_provider_id: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Optimistic concurrency version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insert model for service requests.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = service_requests)]
pub struct NewServiceRequestRow {
    /// Request identifier.
    pub id: uuid::Uuid,
    /// Owning organization.
    pub organization_id: uuid::Uuid,
    /// Customer name.
    pub customer_name: String,
    /// Customer email.
    pub customer_email: Option<String>,
    /// Customer phone.
    pub customer_phone: Option<String>,
    /// Service address.
    pub address: String,
    /// Problem description.
    pub problem_description: String,
    /// Requested service type.
    pub service_type_id: Option<uuid::Uuid>,
    /// Dispatch priority.
    pub priority: String,
    /// Origin label.
    pub source: Option<String>,
    /// Assigned provider.
    pub assigned_provider_id: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Optimistic concurrency version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Mutable columns written by a version-guarded update.
///
/// `None` clears the column rather than leaving it unchanged.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = service_requests)]
#[diesel(treat_none_as_null = true)]
pub struct ServiceRequestChangeset {
    /// Assigned provider.
    pub assigned_provider_id: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// New version.
    pub version: i64,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}
