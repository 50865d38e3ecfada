//! Generate Service - main application orchestrator.
//!
//! This service coordinates the full generation workflow:
//! 1. Compile models
//! 2. Emit the swagger document when the app publishes one
//! 3. Compose the file set (completes fully before the first write)
//! 4. Render each planned file and write it, honoring its write policy
//! 5. Optionally invoke the build tool
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        composer::{Composer, WritePolicy},
        model_compiler::ModelCompiler,
        ports::{BuildTool, Filesystem, TemplateRenderer},
        swagger::{ApiMeta, SwaggerEmitter},
    },
    domain::{AppType, Spec},
    error::KitgenResult,
};

/// Options for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Root directory the generated tree is written under.
    pub project_dir: PathBuf,
    /// Omit generator metadata files (marker, spec snapshot).
    pub single_shot: bool,
    /// Overwrite create-once files that already exist.
    pub force: bool,
    /// Plan and report without writing anything.
    pub dry_run: bool,
    /// Skip the build-tool invocation after writing.
    pub skip_build: bool,
}

impl GenerateOptions {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            single_shot: false,
            force: false,
            dry_run: false,
            skip_build: true,
        }
    }
}

/// What one generation run produced.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub dry_run: bool,
}

impl GenerationReport {
    pub fn file_count(&self) -> usize {
        self.written.len()
    }
}

/// Main generation service.
///
/// Orchestrates model compilation, swagger emission, composition, rendering,
/// and writing.
pub struct GenerateService {
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
    build_tool: Option<Box<dyn BuildTool>>,
}

impl GenerateService {
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        renderer: Box<dyn TemplateRenderer>,
        build_tool: Option<Box<dyn BuildTool>>,
    ) -> Self {
        Self {
            filesystem,
            renderer,
            build_tool,
        }
    }

    /// Generate a project from a normalized spec.
    ///
    /// Composition runs to completion before any file is written, so a
    /// failed composition leaves the target directory untouched.
    #[instrument(skip_all, fields(app = %spec.app_name, dir = %options.project_dir.display()))]
    pub fn generate(&self, spec: &Spec, options: &GenerateOptions) -> KitgenResult<GenerationReport> {
        info!("Generating {} project", spec.app_type);

        let models = ModelCompiler::compile(&spec.models)?;

        let swagger = if spec.host_swagger && spec.app_type == AppType::Crud {
            Some(SwaggerEmitter::emit(&models, &ApiMeta::for_app(&spec.app_name)))
        } else {
            None
        };

        let composition =
            Composer::compose(spec, &models, swagger.as_ref(), !options.single_shot)?;
        debug!(files = composition.len(), "composition complete");

        let mut report = GenerationReport {
            dry_run: options.dry_run,
            ..Default::default()
        };

        for (relative, planned) in composition.files() {
            let target = options.project_dir.join(relative);

            if planned.policy == WritePolicy::CreateOnce
                && !options.force
                && self.filesystem.exists(&target)
            {
                debug!(path = %target.display(), "exists, keeping user copy");
                report.skipped.push(target);
                continue;
            }

            if options.dry_run {
                report.written.push(target);
                continue;
            }

            let content = self
                .renderer
                .render(planned.template, &planned.context.resolved_values())?;
            self.write(&target, &content)?;
            report.written.push(target);
        }

        info!(
            written = report.written.len(),
            skipped = report.skipped.len(),
            "Generation complete"
        );

        if !options.dry_run && !options.skip_build {
            self.run_build(&options.project_dir)?;
        }

        Ok(report)
    }

    /// Directory creation is implied by file writes; failure aborts the run.
    fn write(&self, path: &Path, content: &str) -> KitgenResult<()> {
        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(path, content)
    }

    fn run_build(&self, project_dir: &Path) -> KitgenResult<()> {
        match &self.build_tool {
            Some(tool) => {
                info!("Running build");
                tool.build(project_dir)
            }
            None => {
                warn!("No build tool configured, skipping build");
                Err(ApplicationError::AdapterNotConfigured { name: "build tool" }.into())
            }
        }
    }
}
