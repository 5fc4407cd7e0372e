//! Fieldline: multi-tenant field-service dispatch core.
//!
//! This crate owns the service request lifecycle for a dispatch backend:
//! validated status transitions with provider assignment, provider
//! soft-deletion with request orphaning, provider skill replacement, and the
//! schema-level validation that gates all of them.
//!
//! # Architecture
//!
//! Fieldline follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//! - **Services**: Orchestration over ports, generic over repositories and
//!   clock
//!
//! # Modules
//!
//! - [`validation`]: Field rules and aggregated validation errors
//! - [`organization`]: Tenant directory and slug resolution
//! - [`service_type`]: Tenant-scoped service type catalogue
//! - [`request`]: Service request lifecycle engine and inbound intake
//! - [`provider`]: Provider lifecycle, orphaning, and skills
//! - [`persistence`]: Shared repository errors, paging, and call policy
//! - [`api`]: HTTP surface over the lifecycle services

pub mod api;
pub mod config;
pub mod error;
pub mod organization;
pub mod persistence;
pub mod provider;
pub mod request;
pub mod service_type;
pub mod telemetry;
pub mod validation;
