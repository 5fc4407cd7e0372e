//! `PostgreSQL` adapter for the organization directory.

mod models;
mod repository;
mod schema;

pub use repository::PostgresOrganizationDirectory;
