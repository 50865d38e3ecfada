//! Raw-input validators.
//!
//! These run before any spec-builder work begins; a failure here halts
//! generation with a user-correctable message. Centralized so the rules are
//! stated once, not scattered across prompt callbacks.

use crate::domain::error::DomainError;

/// Centralized input validation.
pub struct InputValidator;

impl InputValidator {
    /// Application names become directory names, route prefixes, and service
    /// name prefixes, so the character set is deliberately narrow.
    pub fn validate_app_name(name: &str) -> Result<(), DomainError> {
        if name.is_empty() {
            return Err(DomainError::InvalidAppName {
                name: name.into(),
                reason: "name cannot be empty".into(),
            });
        }
        if name.starts_with('.') {
            return Err(DomainError::InvalidAppName {
                name: name.into(),
                reason: "name cannot start with '.'".into(),
            });
        }
        if name.contains('/') || name.contains('\\') {
            return Err(DomainError::InvalidAppName {
                name: name.into(),
                reason: "name cannot contain path separators".into(),
            });
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::InvalidAppName {
                name: name.into(),
                reason: "only alphanumerics, '-' and '_' are allowed".into(),
            });
        }
        Ok(())
    }

    /// Ports below 1024 are privileged; the generated server cannot bind them
    /// as an ordinary user.
    pub fn validate_port(raw: &str) -> Result<u16, DomainError> {
        let port: u16 = raw.parse().map_err(|_| DomainError::InvalidPort {
            value: raw.into(),
            reason: "not a number in 0-65535".into(),
        })?;
        if port < 1024 {
            return Err(DomainError::InvalidPort {
                value: raw.into(),
                reason: "ports below 1024 are reserved".into(),
            });
        }
        Ok(port)
    }

    /// Credential values are interpolated into generated config files; reject
    /// control characters outright rather than escaping per target syntax.
    pub fn validate_credential(value: &str) -> Result<(), DomainError> {
        if value.chars().any(|c| c.is_control()) {
            return Err(DomainError::InvalidSpec(
                "credential values cannot contain control characters".into(),
            ));
        }
        Ok(())
    }
}
