//! Diesel schema for providers and skills.

diesel::table! {
    /// Service providers.
    service_providers (id) {
        /// Provider identifier.
        id -> Uuid,
        /// Owning organization.
        organization_id -> Uuid,
        /// Provider name.
        #[max_length = 100]
        name -> Varchar,
        /// Contact email.
        #[max_length = 255]
        email -> Nullable<Varchar>,
        /// Contact phone.
        #[max_length = 32]
        phone -> Nullable<Varchar>,
        /// Rating from 0.0 to 5.0.
        rating -> Float8,
        /// Completed job counter.
        total_jobs_completed -> BigInt,
        /// Status from the roster or availability vocabulary.
        #[max_length = 20]
        status -> Varchar,
        /// Optimistic concurrency version.
        version -> BigInt,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Soft-delete marker.
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Service types each provider can perform.
    provider_skills (provider_id, service_type_id) {
        /// Provider.
        provider_id -> Uuid,
        /// Service type.
        service_type_id -> Uuid,
        /// Proficiency level.
        #[max_length = 20]
        proficiency_level -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
