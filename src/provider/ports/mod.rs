//! Port contracts for provider management.

pub mod repository;
pub mod skills;

pub use repository::{ProviderQuery, ProviderRepository};
pub use skills::ProviderSkillRepository;
