//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The external spec JSON could not be parsed at all.
    #[error("Spec parse failed: {reason}")]
    SpecParse { reason: String },

    /// Template rendering failed.
    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A persisted model document could not be read or written.
    #[error("Model store error at {path}: {reason}")]
    ModelStore { path: PathBuf, reason: String },

    /// The external build tool exited non-zero.
    #[error("Build failed: '{command}' exited with code {code}")]
    BuildFailed { command: String, code: i32 },

    /// SDK-generation collaborator failed. Never rolls back written files;
    /// only the optional SDK follow-up is lost.
    #[error("SDK generation failed: {reason}")]
    SdkGeneration { reason: String },

    /// Port/Adapter not configured.
    #[error("Required adapter not configured: {name}")]
    AdapterNotConfigured { name: &'static str },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SpecParse { reason } => vec![
                format!("The spec is not valid JSON: {}", reason),
                "Check --spec / --spec-file for syntax errors".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::ModelStore { path, .. } => vec![
                format!("Model document: {}", path.display()),
                "Each model is one JSON file under the models directory".into(),
            ],
            Self::BuildFailed { command, .. } => vec![
                format!("'{}' failed; the generated project was still written", command),
                "Re-run with --skip-build to generate without compiling".into(),
            ],
            Self::SdkGeneration { .. } => vec![
                "The generated project files are intact".into(),
                "Only the optional SDK integration step was skipped".into(),
            ],
            Self::AdapterNotConfigured { name } => vec![
                format!("Required component not configured: {}", name),
                "This is likely a configuration error".into(),
            ],
            Self::RenderingFailed { .. } => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SpecParse { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } | Self::RenderingFailed { .. } => ErrorCategory::Internal,
            Self::ModelStore { .. } => ErrorCategory::Validation,
            Self::BuildFailed { .. } | Self::SdkGeneration { .. } => ErrorCategory::Internal,
            Self::AdapterNotConfigured { .. } => ErrorCategory::Configuration,
        }
    }
}
