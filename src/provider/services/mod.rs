//! Orchestration services for provider management.

mod lifecycle;

pub use lifecycle::{
    ProviderDeletion, ProviderLifecycleError, ProviderLifecycleResult, ProviderLifecycleService,
    RegisterProvider,
};
