//! Implementation of the `kitgen generate` command.
//!
//! Responsibility: resolve a normalized spec from the arguments, call the
//! core generate service, and display results.  No composition logic lives
//! here.

use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info, instrument};

use kitgen_adapters::{JsonModelStore, LocalFilesystem, SimpleRenderer, SwiftBuildTool};
use kitgen_core::{
    application::{
        GenerateOptions, GenerateService, SpecBuilder,
        ports::{ModelStore as _, merge_models},
    },
    domain::{AppType, Spec},
};

use crate::{
    cli::{GenerateArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `kitgen generate` command.
///
/// Dispatch sequence:
/// 1. Resolve the spec from `--spec`, `--spec-file`, or the NAME positional
/// 2. Resolve the target directory
/// 3. Show the resolved configuration
/// 4. Run the generate service (dry-run included; it just plans)
/// 5. Print the report and next-steps guidance
#[instrument(skip_all)]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Resolve the spec
    let mut spec = resolve_spec(&args)?;

    debug!(
        app = %spec.app_name,
        kind = %spec.app_type,
        models = spec.models.len(),
        "Spec resolved"
    );

    // 2. Resolve target directory: --dir, then config default, then the
    //    application name in the CWD.
    let project_dir = args.dir.clone().unwrap_or_else(|| {
        config
            .defaults
            .output_dir
            .as_ref()
            .map(|d| d.join(&spec.app_name))
            .unwrap_or_else(|| PathBuf::from(&spec.app_name))
    });

    // Persisted model documents under <dir>/models survive regeneration and
    // override spec-embedded models of the same name.
    let models_dir = project_dir.join("models");
    if models_dir.is_dir() {
        let on_disk = JsonModelStore::new()
            .load_all(&models_dir)
            .map_err(CliError::Core)?;
        if !on_disk.is_empty() {
            debug!(count = on_disk.len(), "merging persisted model documents");
            spec.models = merge_models(&spec.models, &on_disk, &[]);
        }
    }

    let mut options = GenerateOptions::new(&project_dir);
    options.single_shot = args.single_shot || config.defaults.single_shot;
    options.force = args.force;
    options.dry_run = args.dry_run;
    options.skip_build = args.skip_build || config.defaults.skip_build;

    // 3. Show configuration
    if !global.quiet {
        show_configuration(&spec, &project_dir, &output)?;
    }

    // 4. Generate
    let service = GenerateService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(SimpleRenderer::new()),
        Some(Box::new(SwiftBuildTool::new())),
    );

    if !args.dry_run {
        output.header(&format!("Generating '{}'...", spec.app_name))?;
    }
    info!(app = %spec.app_name, dir = %project_dir.display(), "Generation started");

    let report = service
        .generate(&spec, &options)
        .map_err(CliError::Core)?;

    info!(app = %spec.app_name, files = report.file_count(), "Generation finished");

    // 5. Report
    if args.dry_run {
        output.info(&format!(
            "Dry run: would write {} file(s) under {}",
            report.file_count(),
            project_dir.display(),
        ))?;
        for path in &report.written {
            output.print(&format!("  {}", path.display()))?;
        }
        return Ok(());
    }

    output.success(&format!(
        "Project '{}' generated ({} files)",
        spec.app_name,
        report.file_count(),
    ))?;

    for path in &report.skipped {
        output.warning(&format!("kept existing {}", path.display()))?;
    }

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", project_dir.display()))?;
        if options.skip_build {
            output.print("  swift build")?;
        }
        output.print("  swift run")?;
    }

    Ok(())
}

// ── Spec resolution ───────────────────────────────────────────────────────────

/// Resolve the spec from the three possible sources.
///
/// A NAME positional alongside `--spec`/`--spec-file` renames the
/// application; on its own it produces a minimal scaffold spec.
fn resolve_spec(args: &GenerateArgs) -> CliResult<Spec> {
    if let Some(raw) = &args.spec {
        let value: Value = serde_json::from_str(raw).map_err(|e| CliError::InvalidInput {
            message: format!("--spec is not valid JSON: {e}"),
            source: Some(Box::new(e)),
        })?;
        return spec_from_value(value, args.name.as_deref());
    }

    if let Some(path) = &args.spec_file {
        let raw = std::fs::read_to_string(path).map_err(|e| CliError::SpecFileUnreadable {
            path: path.clone(),
            source: e,
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|e| CliError::InvalidInput {
            message: format!("{} is not valid JSON: {e}", path.display()),
            source: Some(Box::new(e)),
        })?;
        return spec_from_value(value, args.name.as_deref());
    }

    match &args.name {
        Some(name) => SpecBuilder::new(AppType::Scaffold, name)
            .build()
            .map_err(|e| CliError::Core(e.into())),
        None => Err(CliError::MissingSpecSource),
    }
}

fn spec_from_value(mut value: Value, name_override: Option<&str>) -> CliResult<Spec> {
    if let (Some(name), Some(obj)) = (name_override, value.as_object_mut()) {
        obj.insert("appName".into(), Value::String(name.into()));
    }
    SpecBuilder::from_value(value).map_err(|e| CliError::Core(e.into()))
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(spec: &Spec, dir: &std::path::Path, out: &OutputManager) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Application:  {}", spec.app_name))?;
    out.print(&format!("  Type:         {}", spec.app_type))?;
    if !spec.models.is_empty() {
        out.print(&format!("  Models:       {}", spec.models.len()))?;
    }
    let service_count = spec.services.iter().count();
    if service_count > 0 {
        out.print(&format!("  Services:     {service_count}"))?;
    }
    if spec.targets_cloud() {
        out.print("  Target:       IBM Cloud")?;
    }
    out.print(&format!("  Location:     {}", dir.display()))?;
    out.print("")?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_args(name: Option<&str>, spec: Option<&str>) -> GenerateArgs {
        GenerateArgs {
            name: name.map(String::from),
            spec_file: None,
            spec: spec.map(String::from),
            dir: None,
            skip_build: false,
            single_shot: false,
            force: false,
            dry_run: false,
        }
    }

    #[test]
    fn bare_name_builds_a_scaffold_spec() {
        let spec = resolve_spec(&generate_args(Some("notes"), None)).unwrap();
        assert_eq!(spec.app_name, "notes");
        assert_eq!(spec.app_type, AppType::Scaffold);
        assert!(spec.models.is_empty());
    }

    #[test]
    fn no_name_and_no_spec_is_an_error() {
        assert!(matches!(
            resolve_spec(&generate_args(None, None)),
            Err(CliError::MissingSpecSource)
        ));
    }

    #[test]
    fn inline_spec_parses() {
        let spec = resolve_spec(&generate_args(
            None,
            Some(r#"{"appType":"scaffold","appName":"inline"}"#),
        ))
        .unwrap();
        assert_eq!(spec.app_name, "inline");
    }

    #[test]
    fn name_overrides_spec_app_name() {
        let spec = resolve_spec(&generate_args(
            Some("renamed"),
            Some(r#"{"appType":"scaffold","appName":"original"}"#),
        ))
        .unwrap();
        assert_eq!(spec.app_name, "renamed");
    }

    #[test]
    fn malformed_inline_spec_is_invalid_input() {
        assert!(matches!(
            resolve_spec(&generate_args(None, Some("{not json"))),
            Err(CliError::InvalidInput { .. })
        ));
    }

    #[test]
    fn missing_spec_file_is_not_found() {
        let args = GenerateArgs {
            spec_file: Some(PathBuf::from("/nonexistent/spec.json")),
            ..generate_args(None, None)
        };
        let err = resolve_spec(&args).unwrap_err();
        assert!(matches!(err, CliError::SpecFileUnreadable { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn invalid_app_name_surfaces_as_core_error() {
        let err = resolve_spec(&generate_args(Some(".hidden"), None)).unwrap_err();
        assert!(matches!(err, CliError::Core(_)));
        assert_eq!(err.exit_code(), 2);
    }
}
