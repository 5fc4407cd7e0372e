//! Diesel schema for service types.

diesel::table! {
    /// Service types offered by an organization.
    service_types (id) {
        /// Service type identifier.
        id -> Uuid,
        /// Owning organization.
        organization_id -> Uuid,
        /// Display name.
        #[max_length = 100]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
