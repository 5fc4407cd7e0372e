//! `PostgreSQL` adapter for the service type catalogue.

mod models;
mod repository;
mod schema;

pub use repository::PostgresServiceTypeRepository;
