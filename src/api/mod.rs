//! HTTP surface over the lifecycle services.
//!
//! Handlers validate wire input, resolve the tenant from the route and
//! delegate to the request and provider services. Failures are mapped onto
//! status codes by [`HttpError`]; the webhook collapses every rejection into
//! one indistinguishable response.

pub mod dto;
pub mod error;
pub mod handlers;
mod routes;
mod state;

pub use error::{ErrorResponse, FieldError, HttpError};
pub use routes::create_router;
pub use state::{AppState, ProviderService, Repositories, RequestService, WebhookIntake};
