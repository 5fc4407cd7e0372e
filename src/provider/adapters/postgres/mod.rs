//! `PostgreSQL` adapters for providers and their skills.

mod models;
mod repository;
mod schema;
mod skills;

pub use repository::PostgresProviderRepository;
pub use skills::PostgresProviderSkillRepository;
