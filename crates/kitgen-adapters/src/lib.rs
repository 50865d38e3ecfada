//! Infrastructure adapters for Kitgen.
//!
//! This crate implements the ports defined in `kitgen-core::application::ports`.
//! It contains all external dependencies and I/O operations, plus the
//! built-in template text for every generated file.

pub mod build_tool;
pub mod filesystem;
pub mod model_store;
pub mod renderer;
pub mod sdk;
pub mod templates;

// Re-export commonly used adapters
pub use build_tool::SwiftBuildTool;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use model_store::JsonModelStore;
pub use renderer::SimpleRenderer;
pub use sdk::NullSdkGenerator;
