//! SDK generation adapter.
//!
//! The remote SDK service's HTTP transport is not shipped; this adapter
//! reports the collaborator as unconfigured. Failures here are isolated by
//! the orchestrator and never touch already-written project files.

use kitgen_core::{
    application::{ApplicationError, ports::SdkGenerator},
    domain::Spec,
    error::KitgenResult,
};

/// Stand-in SDK generator for installs without a configured SDK service.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSdkGenerator;

impl NullSdkGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl SdkGenerator for NullSdkGenerator {
    fn generate(&self, _spec: &Spec) -> KitgenResult<String> {
        Err(ApplicationError::AdapterNotConfigured {
            name: "SDK generation service",
        }
        .into())
    }

    fn fetch(&self, _artifact_id: &str) -> KitgenResult<Vec<u8>> {
        Err(ApplicationError::AdapterNotConfigured {
            name: "SDK generation service",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitgen_core::application::SpecBuilder;
    use kitgen_core::domain::AppType;

    #[test]
    fn unconfigured_generator_reports_the_missing_collaborator() {
        let spec = SpecBuilder::new(AppType::Scaffold, "notes").build().unwrap();
        let generator = NullSdkGenerator::new();

        let err = generator.generate(&spec).unwrap_err();
        assert!(err.to_string().contains("SDK generation service"));

        let err = generator.fetch("artifact-42").unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
