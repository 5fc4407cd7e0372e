//! Persistence plumbing shared by every repository port and adapter.
//!
//! The ports of each bounded context return [`RepositoryError`], which keeps
//! the error taxonomy of the generic persistence collaborator in one place:
//! missing rows, duplicate keys, failed version guards, and the transient
//! failures that [`PersistencePolicy`] retries.

mod error;
mod policy;
pub mod postgres;
mod query;
mod version;

pub use error::{EntityKind, RepositoryError, RepositoryResult};
pub use policy::PersistencePolicy;
pub use query::{Page, ParseSortOrderError, SortOrder};
pub use version::RowVersion;
