//! Swift build tool adapter: a blocking subprocess call.

use std::path::Path;
use std::process::Command;

use kitgen_core::{
    application::{ApplicationError, ports::BuildTool},
    error::KitgenResult,
};
use tracing::{info, warn};

/// Invokes `swift build` in the generated project directory.
///
/// Exit-code contract: zero is success, anything else is a build failure.
/// A failed build never removes already-written project files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwiftBuildTool;

impl SwiftBuildTool {
    pub fn new() -> Self {
        Self
    }
}

impl BuildTool for SwiftBuildTool {
    fn build(&self, project_dir: &Path) -> KitgenResult<()> {
        info!(dir = %project_dir.display(), "running swift build");

        let status = Command::new("swift")
            .arg("build")
            .current_dir(project_dir)
            .status()
            .map_err(|e| ApplicationError::BuildFailed {
                command: format!("swift build: {e}"),
                code: -1,
            })?;

        if status.success() {
            Ok(())
        } else {
            let code = status.code().unwrap_or(-1);
            warn!(code, "swift build failed");
            Err(ApplicationError::BuildFailed {
                command: "swift build".into(),
                code,
            }
            .into())
        }
    }
}
