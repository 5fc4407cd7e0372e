//! `PostgreSQL` adapter for service request persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresServiceRequestRepository;
