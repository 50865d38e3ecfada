// ============================================================================
// domain/error.rs - COMPREHENSIVE ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Spec structural errors (fatal, user-correctable at the spec level)
    // ========================================================================
    #[error("Invalid spec: {0}")]
    InvalidSpec(String),

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Service instance of type '{service_type}' has no name")]
    ServiceNameMissing { service_type: String },

    #[error("Duplicate service name '{name}'")]
    DuplicateServiceName { name: String },

    #[error("crudservice '{name}' does not resolve to any declared service")]
    UnknownCrudService { name: String },

    // ========================================================================
    // Validation errors (raw input)
    // ========================================================================
    #[error("Invalid application name '{name}': {reason}")]
    InvalidAppName { name: String, reason: String },

    #[error("Invalid port {value}: {reason}")]
    InvalidPort { value: String, reason: String },

    #[error("Invalid model definition '{model}': {reason}")]
    InvalidModel { model: String, reason: String },

    #[error("Duplicate output path: {path}")]
    DuplicatePath { path: String },

    // ========================================================================
    // Defect-class errors (known-value-set mismatches upstream)
    // ========================================================================
    #[error("Unknown service type '{value}'")]
    UnknownServiceType { value: String },

    #[error("Unrecognized property type '{value}' on {model}.{property}")]
    UnrecognizedPropertyType {
        model: String,
        property: String,
        value: String,
    },

    #[error("Models '{first}' and '{second}' both derive classname '{classname}'")]
    ClassnameCollision {
        first: String,
        second: String,
        classname: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidSpec(msg) => vec![
                "Check your spec JSON against the documented schema".into(),
                format!("Details: {}", msg),
            ],
            Self::MissingRequiredField { field } => vec![
                format!("The spec must provide '{}'", field),
                "Both appType and appName are always required".into(),
            ],
            Self::ServiceNameMissing { service_type } => vec![
                format!("Give every '{}' instance a non-empty name", service_type),
                "Service names identify instances in the deployment manifest".into(),
            ],
            Self::DuplicateServiceName { name } => vec![
                format!("The name '{}' is used by more than one service", name),
                "Service names must be unique across the whole spec".into(),
            ],
            Self::UnknownCrudService { name } => vec![
                format!("No declared service instance is named '{}'", name),
                "crudservice must match the name of a service in 'services'".into(),
                "Omit crudservice to use the in-memory store".into(),
            ],
            Self::UnknownServiceType { value } => vec![
                format!("'{}' is not a known service type", value),
                "Known types: cloudant, redis, objectstorage, appid, \
                 watsonconversation, alertnotification, pushnotifications, autoscaling"
                    .into(),
            ],
            Self::UnrecognizedPropertyType { value, .. } => vec![
                format!("'{}' is not a supported property type", value),
                "Supported types: string, number, boolean, object, array".into(),
            ],
            Self::ClassnameCollision {
                first,
                second,
                classname,
            } => vec![
                format!(
                    "'{}' and '{}' both map to the Swift class '{}'",
                    first, second, classname
                ),
                "Rename one of the models so the derived classnames differ".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSpec(_)
            | Self::MissingRequiredField { .. }
            | Self::ServiceNameMissing { .. }
            | Self::DuplicateServiceName { .. }
            | Self::InvalidAppName { .. }
            | Self::InvalidPort { .. }
            | Self::InvalidModel { .. }
            | Self::DuplicatePath { .. } => ErrorCategory::Validation,
            Self::UnknownCrudService { .. } => ErrorCategory::NotFound,
            Self::UnknownServiceType { .. }
            | Self::UnrecognizedPropertyType { .. }
            | Self::ClassnameCollision { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
