// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for kitgen.
//!
//! This module contains pure business logic: the spec model, the service
//! registry, data-model descriptors, and input validation. All I/O,
//! templating, and rendering concerns are handled via ports (traits)
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: generation is a strict sequential pipeline
//! - **No I/O**: no filesystem, network, or subprocess calls
//! - **Immutable values**: a `Spec` is built once and threaded by value
//! - **Single source of truth**: per-service knowledge lives only in the
//!   registry

pub mod error;
pub mod model;
pub mod registry;
pub mod spec;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use error::{DomainError, ErrorCategory};
pub use model::{Model, PropertyDef, PropertyType, swift_classname};
pub use registry::{
    Credentials, PackageDependency, SERVICE_REGISTRY, ServiceDef, ServiceType,
    bluemix_default_plan, bluemix_service_label, credential_defaults, lookup,
};
pub use spec::{
    AppType, BluemixConfig, Capabilities, RuntimeConfig, ServiceInstance, Services, Spec,
};
pub use validation::InputValidator;
