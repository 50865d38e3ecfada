//! Composition Engine - merges per-feature fragments into per-file contexts.
//!
//! All branching over the spec happens here, once, centrally. The output is
//! a [`Composition`]: a deterministic map from relative output path to a
//! fully-resolved [`PlannedFile`] whose context contains no decision logic
//! for the renderer to perform. Any structural spec violation aborts the
//! whole composition; the file writer is never invoked for a failed run.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::model_compiler::CompiledModel;
use crate::domain::{
    AppType, DomainError, PackageDependency, ServiceType, Spec, bluemix_default_plan,
    bluemix_service_label, credential_defaults, lookup,
};

/// Generator version stamped into the project marker file.
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

// ── Template identity ────────────────────────────────────────────────────────

/// Every generated file's template, as a closed set.
///
/// The adapter crate owns the template text; this enum is the contract
/// between the engine and the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateId {
    Bootstrap,
    Main,
    PackageManifest,
    DeploymentManifest,
    PipelineConfig,
    ToolchainConfig,
    Dockerfile,
    DockerfileTools,
    DockerIgnore,
    CliConfig,
    WebIndex,
    SwaggerRoutes,
    SwaggerDefinition,
    ProductRoutes,
    CrudModel,
    CrudAdapterMemory,
    CrudAdapterCloudant,
    CrudRoutes,
    CrudValues,
    ProjectMarker,
    SpecSnapshot,
}

impl TemplateId {
    /// Write policy is fixed per template at design time, never derived from
    /// the spec. Create-once paths survive re-runs; everything else is
    /// generator-owned and overwritten.
    pub fn policy(&self) -> WritePolicy {
        match self {
            Self::PackageManifest
            | Self::DeploymentManifest
            | Self::ProjectMarker
            | Self::SpecSnapshot => WritePolicy::CreateOnce,
            _ => WritePolicy::Overwrite,
        }
    }
}

/// Idempotent "create if absent" vs. "always overwrite".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    CreateOnce,
    Overwrite,
}

// ── File context ─────────────────────────────────────────────────────────────

/// The resolved set of fragments/imports/dependencies destined for one
/// generated output file. Built fresh per generation run; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileContext {
    /// Import statements; a set so duplicates across same-type instances
    /// collapse.
    pub imports: BTreeSet<String>,
    /// Declared-variable fragments, in service iteration order.
    pub service_variables: Vec<String>,
    /// Connection/initializer fragments, in service iteration order.
    /// Initializers may have ordering dependencies.
    pub service_initializers: Vec<String>,
    /// Capability initializer fragments, in fixed priority order.
    pub capability_initializers: Vec<String>,
    pub middleware_registrations: Vec<String>,
    pub endpoint_registrations: Vec<String>,
    /// Rendered package-manifest dependency lines, sorted set semantics.
    pub package_dependencies: BTreeSet<String>,
    /// Scalar substitution values for the renderer.
    pub values: BTreeMap<String, String>,
}

impl FileContext {
    pub fn with_value(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// Flatten into the flat key/value map the dumb renderer consumes.
    /// List fields become newline-joined blocks under fixed keys.
    pub fn resolved_values(&self) -> BTreeMap<String, String> {
        let mut out = self.values.clone();
        out.insert(
            "IMPORTS".into(),
            self.imports
                .iter()
                .map(|module| format!("import {module}"))
                .collect::<Vec<_>>()
                .join("\n"),
        );
        out.insert("SERVICE_VARIABLES".into(), self.service_variables.join("\n"));
        out.insert(
            "SERVICE_INITIALIZERS".into(),
            self.service_initializers.join("\n"),
        );
        out.insert(
            "CAPABILITY_INITIALIZERS".into(),
            self.capability_initializers.join("\n"),
        );
        out.insert(
            "MIDDLEWARE_REGISTRATIONS".into(),
            self.middleware_registrations.join("\n"),
        );
        out.insert(
            "ENDPOINT_REGISTRATIONS".into(),
            self.endpoint_registrations.join("\n"),
        );
        out.insert(
            "PACKAGE_DEPENDENCIES".into(),
            self.package_dependencies
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join("\n"),
        );
        out
    }
}

// ── Composition ──────────────────────────────────────────────────────────────

/// One planned output file: which template, with what context, under which
/// write policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub template: TemplateId,
    pub context: FileContext,
    pub policy: WritePolicy,
}

/// The full composed file set, path-keyed in deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    files: BTreeMap<String, PlannedFile>,
}

impl Composition {
    fn insert(&mut self, path: impl Into<String>, file: PlannedFile) -> Result<(), DomainError> {
        let path = path.into();
        if self.files.contains_key(&path) {
            return Err(DomainError::DuplicatePath { path });
        }
        self.files.insert(path, file);
        Ok(())
    }

    fn plan(
        &mut self,
        path: impl Into<String>,
        template: TemplateId,
        context: FileContext,
    ) -> Result<(), DomainError> {
        self.insert(
            path,
            PlannedFile {
                template,
                context,
                policy: template.policy(),
            },
        )
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &PlannedFile)> {
        self.files.iter().map(|(path, file)| (path.as_str(), file))
    }

    pub fn get(&self, path: &str) -> Option<&PlannedFile> {
        self.files.get(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Fire-and-forget follow-up: merge extra rendered dependency lines into
    /// the package manifest context. Used for SDK-derived additions after the
    /// core file set is already planned (or written).
    pub fn append_dependencies(&mut self, extra: impl IntoIterator<Item = String>) {
        if let Some(manifest) = self.files.get_mut(paths::PACKAGE_MANIFEST) {
            manifest.context.package_dependencies.extend(extra);
        }
    }
}

// ── Fixed output paths ───────────────────────────────────────────────────────

pub mod paths {
    pub const BOOTSTRAP: &str = "Sources/Application/Application.swift";
    pub const PACKAGE_MANIFEST: &str = "Package.swift";
    pub const DEPLOYMENT_MANIFEST: &str = "manifest.yml";
    pub const PIPELINE: &str = ".bluemix/pipeline.yml";
    pub const TOOLCHAIN: &str = ".bluemix/toolchain.yml";
    pub const DOCKERFILE: &str = "Dockerfile";
    pub const DOCKERFILE_TOOLS: &str = "Dockerfile-tools";
    pub const DOCKER_IGNORE: &str = ".dockerignore";
    pub const CLI_CONFIG: &str = "cli-config.yml";
    pub const WEB_INDEX: &str = "public/index.html";
    pub const SWAGGER_ROUTES: &str = "Sources/Application/Routes/SwaggerRoutes.swift";
    pub const PRODUCT_ROUTES: &str = "Sources/Application/Routes/ProductRoutes.swift";
    pub const PROJECT_MARKER: &str = ".kitgen-project";
    pub const SPEC_SNAPSHOT: &str = "spec.json";
    pub const CRUD_VALUES: &str = "Sources/Application/Models/ModelValues.swift";

    pub fn main_file(app_name: &str) -> String {
        format!("Sources/{app_name}/main.swift")
    }

    pub fn swagger_definition(app_name: &str) -> String {
        format!("definitions/{app_name}.json")
    }

    pub fn crud_model(classname: &str) -> String {
        format!("Sources/Application/Models/{classname}.swift")
    }

    pub fn crud_adapter(classname: &str) -> String {
        format!("Sources/Application/Adapters/{classname}Adapter.swift")
    }

    pub fn crud_routes(classname: &str) -> String {
        format!("Sources/Application/Routes/{classname}Routes.swift")
    }
}

// ── Fixed fragments and baseline dependencies ────────────────────────────────

/// Always-present manifest dependencies: the web framework and the logger.
static BASELINE_DEPENDENCIES: &[PackageDependency] = &[
    PackageDependency {
        name: "Kitura",
        url: "https://github.com/Kitura/Kitura.git",
        major_version: "2",
    },
    PackageDependency {
        name: "HeliumLogger",
        url: "https://github.com/Kitura/HeliumLogger.git",
        major_version: "1",
    },
];

static METRICS_DEPENDENCY: PackageDependency = PackageDependency {
    name: "SwiftMetrics",
    url: "https://github.com/RuntimeTools/SwiftMetrics.git",
    major_version: "2",
};

static CLOUD_ENVIRONMENT_DEPENDENCY: PackageDependency = PackageDependency {
    name: "CloudEnvironment",
    url: "https://github.com/Kitura/CloudEnvironment.git",
    major_version: "9",
};

const METRICS_INITIALIZER: &str = "let metrics = try SwiftMetrics()\nlet monitoring = metrics.monitor()";

const AUTOSCALE_INITIALIZER: &str = "_ = AutoScalar(swiftMetricsInstance: metrics)";

const APPID_MIDDLEWARE: &str = "let kituraCredentials = Credentials()\nkituraCredentials.register(plugin: webCredentialsPlugin!)";

fn render_dependency(dep: &PackageDependency) -> String {
    format!(
        "        .package(url: \"{}\", from: \"{}.0.0\"),",
        dep.url, dep.major_version
    )
}

/// Resolve `{{key}}` placeholders in a fragment. Placeholders without a
/// matching pair are left intact so defects are visible in output, not
/// silently blanked.
pub fn fill(template: &str, pairs: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (key, value) in pairs {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

fn credential_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── The engine ───────────────────────────────────────────────────────────────

/// Walks the normalized spec and plans every output file.
pub struct Composer;

impl Composer {
    /// Compose the full file set for a spec.
    ///
    /// `swagger` is the emitted document when the spec publishes one.
    /// `include_metadata` is false for single-shot runs, which omit the
    /// generator marker and spec snapshot.
    #[instrument(skip_all, fields(app = %spec.app_name))]
    pub fn compose(
        spec: &Spec,
        models: &[CompiledModel],
        swagger: Option<&Value>,
        include_metadata: bool,
    ) -> Result<Composition, DomainError> {
        spec.services.validate()?;

        let cloud = spec.targets_cloud();
        let mut composition = Composition::default();

        // On a cloud target the platform assigns the port at runtime.
        let port_expression = if cloud {
            "cloudEnv.port".to_string()
        } else {
            spec.config.port.to_string()
        };

        let mut bootstrap = FileContext::default()
            .with_value("APP_NAME", &spec.app_name)
            .with_value("PORT", port_expression);
        let mut manifest = FileContext::default().with_value("APP_NAME", &spec.app_name);

        manifest
            .package_dependencies
            .extend(BASELINE_DEPENDENCIES.iter().map(render_dependency));

        if cloud {
            bootstrap.imports.insert("CloudEnvironment".into());
            // The cloud-flavored initializers all read from this environment.
            bootstrap
                .service_variables
                .push("let cloudEnv = CloudEnv()".into());
            manifest
                .package_dependencies
                .insert(render_dependency(&CLOUD_ENVIRONMENT_DEPENDENCY));
        }

        Self::service_pass(spec, cloud, &mut bootstrap, &mut manifest);
        Self::capability_pass(spec, &mut bootstrap, &mut manifest);
        Self::gated_file_pass(spec, swagger, &mut bootstrap, &mut composition)?;
        Self::model_pass(spec, models, &mut bootstrap, &mut composition)?;

        composition.plan(
            paths::main_file(&spec.app_name),
            TemplateId::Main,
            FileContext::default().with_value("APP_NAME", &spec.app_name),
        )?;

        if include_metadata {
            composition.plan(
                paths::PROJECT_MARKER,
                TemplateId::ProjectMarker,
                FileContext::default().with_value("GENERATOR_VERSION", GENERATOR_VERSION),
            )?;
            let snapshot = serde_json::to_string_pretty(spec).unwrap_or_default();
            composition.plan(
                paths::SPEC_SNAPSHOT,
                TemplateId::SpecSnapshot,
                FileContext::default().with_value("SPEC_JSON", snapshot),
            )?;
        }

        composition.plan(paths::BOOTSTRAP, TemplateId::Bootstrap, bootstrap)?;
        composition.plan(paths::PACKAGE_MANIFEST, TemplateId::PackageManifest, manifest)?;

        debug!(files = composition.len(), "composition complete");
        Ok(composition)
    }

    /// Iterate services in canonical registry order; select cloud or local
    /// flavored fragments per instance.
    fn service_pass(
        spec: &Spec,
        cloud: bool,
        bootstrap: &mut FileContext,
        manifest: &mut FileContext,
    ) {
        for (service_type, instance) in spec.services.iter() {
            let def = lookup(service_type);

            for module in def.imports {
                bootstrap.imports.insert((*module).to_string());
            }
            if cloud {
                for module in def.cloud_imports {
                    bootstrap.imports.insert((*module).to_string());
                }
            }

            // One declaration per service type even with multiple instances;
            // the variable names in the fragments are per-type.
            if !def.variable_fragment.is_empty()
                && !bootstrap
                    .service_variables
                    .contains(&def.variable_fragment.to_string())
            {
                bootstrap
                    .service_variables
                    .push(def.variable_fragment.to_string());
            }

            let initializer = if cloud {
                fill(
                    def.cloud_initializer,
                    &[("name", instance.name.clone())],
                )
            } else {
                let credentials = credential_defaults(service_type, &instance.credentials);
                let pairs: Vec<(&str, String)> = credentials
                    .iter()
                    .map(|(key, value)| (key.as_str(), credential_str(value)))
                    .collect();
                fill(def.local_initializer, &pairs)
            };
            if !initializer.is_empty() {
                bootstrap.service_initializers.push(initializer);
            }

            if service_type == ServiceType::AppId {
                bootstrap
                    .middleware_registrations
                    .push(APPID_MIDDLEWARE.to_string());
            }

            if let Some(dependency) = &def.dependency {
                manifest
                    .package_dependencies
                    .insert(render_dependency(dependency));
            }
        }
    }

    /// Capabilities in fixed priority order: metrics before autoscale.
    /// Autoscale re-checks metrics locally; the engine does not trust
    /// upstream normalization blindly.
    fn capability_pass(spec: &Spec, bootstrap: &mut FileContext, manifest: &mut FileContext) {
        if spec.capabilities.metrics {
            bootstrap.imports.insert("SwiftMetrics".into());
            bootstrap
                .capability_initializers
                .push(METRICS_INITIALIZER.to_string());
            manifest
                .package_dependencies
                .insert(render_dependency(&METRICS_DEPENDENCY));
        }

        if spec.capabilities.autoscale.is_some() && spec.capabilities.metrics {
            bootstrap.imports.insert("SwiftMetricsBluemix".into());
            bootstrap
                .capability_initializers
                .push(AUTOSCALE_INITIALIZER.to_string());
        }
    }

    /// All-or-nothing satellite files, each keyed by exactly one boolean.
    fn gated_file_pass(
        spec: &Spec,
        swagger: Option<&Value>,
        bootstrap: &mut FileContext,
        composition: &mut Composition,
    ) -> Result<(), DomainError> {
        if spec.web {
            composition.plan(
                paths::WEB_INDEX,
                TemplateId::WebIndex,
                FileContext::default().with_value("APP_NAME", &spec.app_name),
            )?;
        }

        if spec.host_swagger {
            composition.plan(
                paths::SWAGGER_ROUTES,
                TemplateId::SwaggerRoutes,
                FileContext::default().with_value("APP_NAME", &spec.app_name),
            )?;
            bootstrap
                .endpoint_registrations
                .push("initializeSwaggerRoutes(app: self)".into());

            if let Some(doc) = swagger {
                let rendered = serde_json::to_string_pretty(doc).unwrap_or_default();
                composition.plan(
                    paths::swagger_definition(&spec.app_name),
                    TemplateId::SwaggerDefinition,
                    FileContext::default().with_value("SWAGGER_JSON", rendered),
                )?;
            }
        }

        if spec.example_endpoints {
            composition.plan(
                paths::PRODUCT_ROUTES,
                TemplateId::ProductRoutes,
                FileContext::default().with_value("APP_NAME", &spec.app_name),
            )?;
            bootstrap
                .endpoint_registrations
                .push("initializeProductRoutes(app: self)".into());
        }

        if spec.docker {
            let docker_ctx = || FileContext::default().with_value("APP_NAME", &spec.app_name);
            composition.plan(paths::DOCKERFILE, TemplateId::Dockerfile, docker_ctx())?;
            composition.plan(
                paths::DOCKERFILE_TOOLS,
                TemplateId::DockerfileTools,
                docker_ctx(),
            )?;
            composition.plan(paths::DOCKER_IGNORE, TemplateId::DockerIgnore, docker_ctx())?;
            composition.plan(paths::CLI_CONFIG, TemplateId::CliConfig, docker_ctx())?;
        }

        if let Some(bluemix) = &spec.bluemix {
            let mut deployment = FileContext::default()
                .with_value(
                    "CLOUD_NAME",
                    bluemix.name.clone().unwrap_or_else(|| spec.app_name.clone()),
                )
                .with_value("MEMORY", bluemix.memory.clone().unwrap_or_else(|| "256M".into()))
                .with_value(
                    "DISK_QUOTA",
                    bluemix.disk_quota.clone().unwrap_or_else(|| "1024M".into()),
                )
                .with_value(
                    "INSTANCES",
                    bluemix.instances.unwrap_or(1).to_string(),
                );

            // Only pin a route when meaningful host/domain values exist;
            // otherwise the platform assigns a random route.
            let route = if bluemix.has_route() {
                format!(
                    "  host: {}\n  domain: {}",
                    bluemix.host.as_deref().unwrap_or_default(),
                    bluemix.domain.as_deref().unwrap_or_default()
                )
            } else {
                "  random-route: true".to_string()
            };
            deployment.values.insert("ROUTE".into(), route);

            let mut declared = String::new();
            for (service_type, instance) in spec.services.iter() {
                let key = service_type.as_str();
                declared.push_str(&format!(
                    "  {}:\n    label: {}\n    plan: {}\n",
                    instance.name,
                    bluemix_service_label(key),
                    bluemix_default_plan(key)
                ));
            }
            deployment
                .values
                .insert("DECLARED_SERVICES".into(), declared);

            let service_names: Vec<String> = spec
                .services
                .iter()
                .map(|(_, instance)| format!("    - {}", instance.name))
                .collect();
            deployment
                .values
                .insert("SERVICE_NAMES".into(), service_names.join("\n"));
            deployment
                .values
                .insert("APP_NAME".into(), spec.app_name.clone());

            composition.plan(
                paths::DEPLOYMENT_MANIFEST,
                TemplateId::DeploymentManifest,
                deployment,
            )?;
            composition.plan(
                paths::PIPELINE,
                TemplateId::PipelineConfig,
                FileContext::default().with_value("APP_NAME", &spec.app_name),
            )?;
            composition.plan(
                paths::TOOLCHAIN,
                TemplateId::ToolchainConfig,
                FileContext::default().with_value("APP_NAME", &spec.app_name),
            )?;
        }

        Ok(())
    }

    /// One model/adapter/routes triad per compiled model, CRUD only.
    /// The adapter flavor follows the resolved `crudservice` backing store.
    fn model_pass(
        spec: &Spec,
        models: &[CompiledModel],
        bootstrap: &mut FileContext,
        composition: &mut Composition,
    ) -> Result<(), DomainError> {
        if spec.app_type != AppType::Crud {
            return Ok(());
        }

        let store = spec.crud_store()?;
        let (adapter_template, store_name) = match store {
            None => (TemplateId::CrudAdapterMemory, String::new()),
            Some(ServiceType::Cloudant) => (
                TemplateId::CrudAdapterCloudant,
                spec.crud_service.clone().unwrap_or_default(),
            ),
            Some(other) => {
                return Err(DomainError::InvalidSpec(format!(
                    "crudservice must reference a cloudant instance, got '{other}'"
                )));
            }
        };

        // The triad constructors all decode through the shared values helper,
        // so it ships whenever any model does.
        if !models.is_empty() {
            composition.plan(
                paths::CRUD_VALUES,
                TemplateId::CrudValues,
                FileContext::default(),
            )?;
        }

        for model in models {
            let declarations: Vec<String> = model
                .properties
                .iter()
                .map(|p| format!("    public var {}: {}", p.name, p.swift_type))
                .collect();
            let extractions: Vec<String> = model
                .properties
                .iter()
                .map(|p| {
                    format!(
                        "        self.{name} = try values.{accessor}(\"{name}\")",
                        name = p.name,
                        accessor = p.accessor
                    )
                })
                .collect();

            let triad_ctx = FileContext::default()
                .with_value("APP_NAME", &spec.app_name)
                .with_value("CLASS_NAME", &model.classname)
                .with_value("MODEL_NAME", &model.name)
                .with_value("PLURAL", &model.plural)
                .with_value("SERVICE_NAME", &store_name)
                .with_value("PROPERTY_DECLARATIONS", declarations.join("\n"))
                .with_value("PROPERTY_EXTRACTIONS", extractions.join("\n"));

            composition.plan(
                paths::crud_model(&model.classname),
                TemplateId::CrudModel,
                triad_ctx.clone(),
            )?;
            composition.plan(
                paths::crud_adapter(&model.classname),
                adapter_template,
                triad_ctx.clone(),
            )?;
            composition.plan(
                paths::crud_routes(&model.classname),
                TemplateId::CrudRoutes,
                triad_ctx,
            )?;

            bootstrap
                .endpoint_registrations
                .push(format!("initialize{}Routes(app: self)", model.classname));
        }

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::model_compiler::ModelCompiler;
    use crate::application::spec_builder::SpecBuilder;
    use serde_json::json;

    fn compose(spec: &Spec) -> Composition {
        let models = ModelCompiler::compile(&spec.models).unwrap();
        Composer::compose(spec, &models, None, true).unwrap()
    }

    #[test]
    fn minimal_scaffold_has_no_service_fragments() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes"
        }))
        .unwrap();
        let composition = compose(&spec);

        let bootstrap = &composition.get(paths::BOOTSTRAP).unwrap().context;
        assert!(bootstrap.imports.is_empty());
        assert!(bootstrap.service_initializers.is_empty());
        assert!(bootstrap.capability_initializers.is_empty());

        let manifest = &composition.get(paths::PACKAGE_MANIFEST).unwrap().context;
        assert_eq!(manifest.package_dependencies.len(), 2);
    }

    #[test]
    fn same_service_twice_unions_the_dependency_but_not_the_initializers() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "services": {"cloudant": [{"name": "db1"}, {"name": "db2"}]}
        }))
        .unwrap();
        let composition = compose(&spec);

        let manifest = &composition.get(paths::PACKAGE_MANIFEST).unwrap().context;
        let couch_deps = manifest
            .package_dependencies
            .iter()
            .filter(|d| d.contains("Kitura-CouchDB"))
            .count();
        assert_eq!(couch_deps, 1);

        let bootstrap = &composition.get(paths::BOOTSTRAP).unwrap().context;
        assert_eq!(bootstrap.service_initializers.len(), 2);
        assert_eq!(bootstrap.service_variables.len(), 1);
    }

    #[test]
    fn cloud_target_selects_cloud_flavored_initializers() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "bluemix": true,
            "services": {"cloudant": [{"name": "db1"}]}
        }))
        .unwrap();
        let composition = compose(&spec);
        let bootstrap = &composition.get(paths::BOOTSTRAP).unwrap().context;
        assert!(bootstrap.service_initializers[0].contains("getCloudantCredentials(name: \"db1\")"));
        assert!(bootstrap.imports.contains("CloudEnvironment"));
    }

    #[test]
    fn control_character_credentials_abort_composition() {
        // Bypass the builder so the engine's own validate() is what fires.
        let mut spec = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "services": {"cloudant": [{"name": "db1"}]}
        }))
        .unwrap();
        if let Some(instances) = spec.services.0.get_mut(&ServiceType::Cloudant) {
            instances[0]
                .credentials
                .insert("password".into(), json!("p\nw\"break"));
        }

        let err = Composer::compose(&spec, &[], None, true).unwrap_err();
        assert!(matches!(err, DomainError::InvalidSpec(_)));
    }

    #[test]
    fn local_initializer_interpolates_defaulted_credentials() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "services": {"cloudant": [{"name": "db1", "credentials": {"port": 999}}]}
        }))
        .unwrap();
        let composition = compose(&spec);
        let bootstrap = &composition.get(paths::BOOTSTRAP).unwrap().context;
        let init = &bootstrap.service_initializers[0];
        assert!(init.contains("host: \"localhost\""));
        assert!(init.contains("port: 999"));
        assert!(!init.contains("{{"));
    }

    #[test]
    fn autoscale_fragment_requires_metrics_in_context() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "capabilities": {"autoscale": true}
        }))
        .unwrap();
        let composition = compose(&spec);
        let bootstrap = &composition.get(paths::BOOTSTRAP).unwrap().context;
        assert_eq!(bootstrap.capability_initializers.len(), 2);
        assert!(bootstrap.capability_initializers[0].contains("SwiftMetrics"));
        assert!(bootstrap.capability_initializers[1].contains("AutoScalar"));

        // Defensive re-check: metrics stripped from an already-built spec
        // means no autoscale fragment either.
        let mut tampered = spec;
        tampered.capabilities.metrics = false;
        let models = ModelCompiler::compile(&tampered.models).unwrap();
        let composition = Composer::compose(&tampered, &models, None, true).unwrap();
        let bootstrap = &composition.get(paths::BOOTSTRAP).unwrap().context;
        assert!(bootstrap.capability_initializers.is_empty());
    }

    #[test]
    fn crud_without_backing_service_is_memory_flavored() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "crud",
            "appName": "todo",
            "models": [
                {"name": "todo", "properties": {"title": {"type": "string", "required": true}}},
                {"name": "tag", "properties": {"label": {"type": "string"}}}
            ]
        }))
        .unwrap();
        let composition = compose(&spec);

        for classname in ["Todo", "Tag"] {
            let adapter = composition.get(&paths::crud_adapter(classname)).unwrap();
            assert_eq!(adapter.template, TemplateId::CrudAdapterMemory);
            assert!(composition.get(&paths::crud_model(classname)).is_some());
            assert!(composition.get(&paths::crud_routes(classname)).is_some());
        }
    }

    #[test]
    fn models_bring_the_shared_values_helper_exactly_once() {
        let crud = SpecBuilder::from_value(json!({
            "appType": "crud",
            "appName": "todo",
            "models": [
                {"name": "todo", "properties": {"title": {"type": "string"}}},
                {"name": "tag", "properties": {"label": {"type": "string"}}}
            ]
        }))
        .unwrap();
        let composition = compose(&crud);
        let helper = composition.get(paths::CRUD_VALUES).unwrap();
        assert_eq!(helper.template, TemplateId::CrudValues);

        let scaffold = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes"
        }))
        .unwrap();
        assert!(compose(&scaffold).get(paths::CRUD_VALUES).is_none());
    }

    #[test]
    fn crudservice_selects_the_cloudant_flavor() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "crud",
            "appName": "todo",
            "crudservice": "db1",
            "services": {"cloudant": [{"name": "db1"}]},
            "models": [{"name": "todo", "properties": {"title": {"type": "string"}}}]
        }))
        .unwrap();
        let composition = compose(&spec);
        let adapter = composition.get(&paths::crud_adapter("Todo")).unwrap();
        assert_eq!(adapter.template, TemplateId::CrudAdapterCloudant);
        assert_eq!(adapter.context.values["SERVICE_NAME"], "db1");
    }

    #[test]
    fn dangling_crudservice_aborts_composition() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "crud",
            "appName": "todo",
            "crudservice": "ghost",
            "models": [{"name": "todo", "properties": {}}]
        }))
        .unwrap();
        let models = ModelCompiler::compile(&spec.models).unwrap();
        let err = Composer::compose(&spec, &models, None, true).unwrap_err();
        assert!(matches!(err, DomainError::UnknownCrudService { .. }));
    }

    #[test]
    fn composition_is_deterministic() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "crud",
            "appName": "todo",
            "bluemix": true,
            "docker": true,
            "web": true,
            "capabilities": {"metrics": true},
            "services": {"redis": [{"name": "cache"}], "cloudant": [{"name": "db1"}]},
            "models": [{"name": "todo", "properties": {"title": {"type": "string"}}}]
        }))
        .unwrap();
        assert_eq!(compose(&spec), compose(&spec));
    }

    #[test]
    fn single_shot_omits_generator_metadata() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes"
        }))
        .unwrap();
        let composition = Composer::compose(&spec, &[], None, false).unwrap();
        assert!(composition.get(paths::PROJECT_MARKER).is_none());
        assert!(composition.get(paths::SPEC_SNAPSHOT).is_none());

        let full = Composer::compose(&spec, &[], None, true).unwrap();
        assert!(full.get(paths::PROJECT_MARKER).is_some());
        assert!(full.get(paths::SPEC_SNAPSHOT).is_some());
    }

    #[test]
    fn bluemix_manifest_pins_route_only_with_host_and_domain() {
        let routed = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "bluemix": {"host": "myapp", "domain": "example.com"}
        }))
        .unwrap();
        let composition = compose(&routed);
        let manifest = composition.get(paths::DEPLOYMENT_MANIFEST).unwrap();
        assert!(manifest.context.values["ROUTE"].contains("host: myapp"));

        let unrouted = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "bluemix": true
        }))
        .unwrap();
        let composition = compose(&unrouted);
        let manifest = composition.get(paths::DEPLOYMENT_MANIFEST).unwrap();
        assert!(manifest.context.values["ROUTE"].contains("random-route"));
    }

    #[test]
    fn deployment_manifest_uses_registry_labels_and_plans() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "bluemix": true,
            "services": {"cloudant": [{"name": "db1"}]}
        }))
        .unwrap();
        let composition = compose(&spec);
        let declared = &composition.get(paths::DEPLOYMENT_MANIFEST).unwrap().context.values
            ["DECLARED_SERVICES"];
        assert!(declared.contains("label: cloudantNoSQLDB"));
        assert!(declared.contains("plan: Lite"));
    }

    #[test]
    fn append_dependencies_extends_the_manifest_set() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes"
        }))
        .unwrap();
        let mut composition = compose(&spec);
        let before = composition
            .get(paths::PACKAGE_MANIFEST)
            .unwrap()
            .context
            .package_dependencies
            .len();
        composition.append_dependencies(vec![
            "        .package(url: \"https://example.com/sdk.git\", from: \"1.0.0\"),".to_string(),
        ]);
        let after = composition
            .get(paths::PACKAGE_MANIFEST)
            .unwrap()
            .context
            .package_dependencies
            .len();
        assert_eq!(after, before + 1);
    }

    #[test]
    fn write_policies_are_fixed_per_template() {
        assert_eq!(TemplateId::PackageManifest.policy(), WritePolicy::CreateOnce);
        assert_eq!(TemplateId::DeploymentManifest.policy(), WritePolicy::CreateOnce);
        assert_eq!(TemplateId::ProjectMarker.policy(), WritePolicy::CreateOnce);
        assert_eq!(TemplateId::Bootstrap.policy(), WritePolicy::Overwrite);
        assert_eq!(TemplateId::CrudAdapterMemory.policy(), WritePolicy::Overwrite);
    }

    #[test]
    fn fill_leaves_unknown_placeholders_visible() {
        let out = fill("host: {{host}}, region: {{region}}", &[("host", "h".into())]);
        assert_eq!(out, "host: h, region: {{region}}");
    }
}
