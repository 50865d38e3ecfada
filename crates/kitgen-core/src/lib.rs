//! Kitgen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Kitgen
//! Swift-server project generator, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           kitgen-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │          (GenerateService)              │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, Renderer, ModelStore, ...) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    kitgen-adapters (Infrastructure)     │
//! │ (LocalFilesystem, SimpleRenderer, etc)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Domain Layer (Pure Logic)         │
//! │   (Spec, ServiceRegistry, Model, ...)   │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Pipeline
//!
//! Spec Builder → Model Compiler / Swagger Emitter → Composition Engine →
//! File Writer. A strict sequential pipeline: the composition completes
//! fully before the first file is written, and any structural spec
//! violation aborts the run with no partial output.

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Composer, Composition, GenerateOptions, GenerateService, GenerationReport, ModelCompiler,
        SpecBuilder, SwaggerEmitter, TemplateId,
        ports::{BuildTool, Filesystem, ModelStore, SdkGenerator, TemplateRenderer},
    };
    pub use crate::domain::{
        AppType, BluemixConfig, Capabilities, Model, PropertyDef, PropertyType, ServiceInstance,
        ServiceType, Services, Spec,
    };
    pub use crate::error::{KitgenError, KitgenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
