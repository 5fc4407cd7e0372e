//! Orchestration services for the request lifecycle.

mod intake;
mod lifecycle;

pub use intake::{IntakeError, IntakeReceipt, IntakeResult, IntakeService, IntakeSubmission};
pub use lifecycle::{
    CreateServiceRequest, RequestLifecycleError, RequestLifecycleResult,
    RequestLifecycleService, TransitionCommand,
};
