//! Diesel schema for service requests.

diesel::table! {
    /// Customer service requests.
    service_requests (id) {
        /// Request identifier.
        id -> Uuid,
        /// Owning organization.
        organization_id -> Uuid,
        /// Customer name.
        #[max_length = 100]
        customer_name -> Varchar,
        /// Customer email.
        #[max_length = 255]
        customer_email -> Nullable<Varchar>,
        /// Customer phone.
        #[max_length = 32]
        customer_phone -> Nullable<Varchar>,
        /// Service address.
        address -> Text,
        /// Problem description.
        problem_description -> Text,
        /// Requested service type.
        service_type_id -> Nullable<Uuid>,
        /// Dispatch priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Origin label.
        #[max_length = 100]
        source -> Nullable<Varchar>,
        /// Assigned provider.
        assigned_provider_id -> Nullable<Uuid>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Optimistic concurrency version.
        version -> BigInt,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Soft-delete marker.
        deleted_at -> Nullable<Timestamptz>,
    }
}
