//! Application layer for Kitgen.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerateService)
//! - **Pipeline stages**: SpecBuilder, ModelCompiler, SwaggerEmitter, Composer
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod composer;
pub mod error;
pub mod model_compiler;
pub mod ports;
pub mod services;
pub mod spec_builder;
pub mod swagger;

// Re-export the pipeline stages
pub use composer::{
    Composer, Composition, FileContext, PlannedFile, TemplateId, WritePolicy,
};
pub use model_compiler::{CompiledModel, CompiledProperty, ModelCompiler};
pub use spec_builder::SpecBuilder;
pub use swagger::{ApiMeta, SwaggerEmitter};

// Re-export main services
pub use services::{GenerateOptions, GenerateService, GenerationReport};

// Re-export port traits (for adapter implementation)
pub use ports::{BuildTool, Filesystem, ModelStore, SdkGenerator, TemplateRenderer};

pub use error::ApplicationError;
