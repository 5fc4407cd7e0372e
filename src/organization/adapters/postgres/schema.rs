//! Diesel schema for organizations.

diesel::table! {
    /// Tenant organizations.
    organizations (id) {
        /// Organization identifier.
        id -> Uuid,
        /// Unique URL slug.
        #[max_length = 100]
        slug -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
