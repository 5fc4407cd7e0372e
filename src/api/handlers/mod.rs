//! Route handlers grouped by resource.

pub mod providers;
pub mod requests;
pub mod webhook;

pub use providers::providers_handler;
pub use requests::requests_handler;
pub use webhook::webhook_handler;
