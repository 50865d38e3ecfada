//! Spec Builder - turns raw external input into a normalized [`Spec`].
//!
//! External spec JSON is partially trusted: unknown keys and wrong-typed
//! values are dropped, not rejected. Everything past this boundary is the
//! fully-typed [`Spec`]; loosely-typed JSON never flows downstream.
//!
//! Normalizations applied here, nowhere else:
//! - `bluemix: true` becomes the empty config object
//! - a bare autoscale opt-in gets the derived `{appName}ScalingService` name
//! - autoscale implies a cloud target and metrics
//! - `appType = crud` forces `hostSwagger = true`
//! - service instances without a credentials record get an empty one

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::{
    AppType, BluemixConfig, Capabilities, Credentials, DomainError, InputValidator, Model,
    PropertyDef, PropertyType, RuntimeConfig, ServiceInstance, ServiceType, Services, Spec,
};

/// Builds a normalized [`Spec`] from external JSON or programmatic input.
pub struct SpecBuilder {
    app_type: AppType,
    app_name: String,
    bluemix: Option<BluemixConfig>,
    metrics: bool,
    autoscale: Option<AutoscaleChoice>,
    services: Services,
    models: Vec<Model>,
    web: bool,
    host_swagger: bool,
    example_endpoints: bool,
    docker: bool,
    crud_service: Option<String>,
    config: RuntimeConfig,
}

/// How autoscaling was requested.
enum AutoscaleChoice {
    /// Opted in without a name; the builder derives one.
    Derived,
    /// Explicit service-instance name from input.
    Named(String),
}

impl SpecBuilder {
    pub fn new(app_type: AppType, app_name: impl Into<String>) -> Self {
        Self {
            app_type,
            app_name: app_name.into(),
            bluemix: None,
            metrics: false,
            autoscale: None,
            services: Services::default(),
            models: Vec::new(),
            web: false,
            host_swagger: false,
            example_endpoints: false,
            docker: false,
            crud_service: None,
            config: RuntimeConfig::default(),
        }
    }

    /// Parse an external spec JSON string.
    pub fn from_json(raw: &str) -> Result<Spec, DomainError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| DomainError::InvalidSpec(format!("not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Build a [`Spec`] from a parsed JSON value.
    ///
    /// Tolerant: unknown keys and wrong-typed values are dropped with a
    /// warning. Only missing required fields and structural violations fail.
    pub fn from_value(value: Value) -> Result<Spec, DomainError> {
        let obj = value
            .as_object()
            .ok_or_else(|| DomainError::InvalidSpec("spec must be a JSON object".into()))?;

        let app_type: AppType = require_str(obj, "appType")?.parse()?;
        let app_name = require_str(obj, "appName")?.to_string();

        let mut builder = SpecBuilder::new(app_type, app_name);

        builder.bluemix = parse_bluemix(obj.get("bluemix"));

        if let Some(caps) = obj.get("capabilities").and_then(Value::as_object) {
            builder.metrics = caps.get("metrics").and_then(Value::as_bool).unwrap_or(false);
            builder.autoscale = match caps.get("autoscale") {
                Some(Value::Bool(true)) => Some(AutoscaleChoice::Derived),
                Some(Value::String(name)) if !name.is_empty() => {
                    Some(AutoscaleChoice::Named(name.clone()))
                }
                Some(other) if !other.is_null() && *other != Value::Bool(false) => {
                    warn!(value = %other, "dropping non-string autoscale value");
                    None
                }
                _ => None,
            };
        }

        if let Some(raw_services) = obj.get("services").and_then(Value::as_object) {
            for (key, instances) in raw_services {
                let service_type: ServiceType = key.parse()?;
                let Some(list) = instances.as_array() else {
                    warn!(service = %key, "dropping non-array service entry");
                    continue;
                };
                for raw in list {
                    builder
                        .services
                        .push(service_type, parse_service_instance(raw));
                }
            }
        }

        if let Some(raw_models) = obj.get("models").and_then(Value::as_array) {
            for raw in raw_models {
                builder.models.push(parse_model(raw)?);
            }
        }

        builder.web = bool_field(obj, "web");
        builder.host_swagger = bool_field(obj, "hostSwagger");
        builder.example_endpoints = bool_field(obj, "exampleEndpoints");
        builder.docker = bool_field(obj, "docker");
        builder.crud_service = obj
            .get("crudservice")
            .and_then(Value::as_str)
            .map(str::to_string);

        if let Some(cfg) = obj.get("config").and_then(Value::as_object) {
            if let Some(logger) = cfg.get("logger").and_then(Value::as_str) {
                builder.config.logger = logger.to_string();
            }
            match cfg.get("port") {
                Some(Value::Number(n)) => {
                    builder.config.port = InputValidator::validate_port(&n.to_string())?;
                }
                Some(Value::String(s)) => {
                    builder.config.port = InputValidator::validate_port(s)?;
                }
                Some(other) if !other.is_null() => {
                    warn!(value = %other, "dropping non-numeric port");
                }
                _ => {}
            }
        }

        builder.build()
    }

    // ── Programmatic construction (prompt flows and tests) ──────────────────

    pub fn bluemix(mut self, config: BluemixConfig) -> Self {
        self.bluemix = Some(config);
        self
    }

    pub fn metrics(mut self, enabled: bool) -> Self {
        self.metrics = enabled;
        self
    }

    /// Opt in to autoscaling; the service name is derived from the app name.
    pub fn autoscale(mut self) -> Self {
        self.autoscale = Some(AutoscaleChoice::Derived);
        self
    }

    pub fn autoscale_named(mut self, name: impl Into<String>) -> Self {
        self.autoscale = Some(AutoscaleChoice::Named(name.into()));
        self
    }

    pub fn service(mut self, service_type: ServiceType, instance: ServiceInstance) -> Self {
        self.services.push(service_type, instance);
        self
    }

    pub fn model(mut self, model: Model) -> Self {
        self.models.push(model);
        self
    }

    pub fn web(mut self, enabled: bool) -> Self {
        self.web = enabled;
        self
    }

    pub fn host_swagger(mut self, enabled: bool) -> Self {
        self.host_swagger = enabled;
        self
    }

    pub fn example_endpoints(mut self, enabled: bool) -> Self {
        self.example_endpoints = enabled;
        self
    }

    pub fn docker(mut self, enabled: bool) -> Self {
        self.docker = enabled;
        self
    }

    pub fn crud_service(mut self, name: impl Into<String>) -> Self {
        self.crud_service = Some(name.into());
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Apply the normalization rules and structural checks, producing the
    /// immutable [`Spec`] every downstream component consumes.
    pub fn build(self) -> Result<Spec, DomainError> {
        InputValidator::validate_app_name(&self.app_name)?;

        let mut bluemix = self.bluemix;
        let mut metrics = self.metrics;

        let autoscale = self.autoscale.map(|choice| match choice {
            AutoscaleChoice::Named(name) => name,
            AutoscaleChoice::Derived => format!("{}ScalingService", self.app_name),
        });

        // Autoscaling cannot exist without monitoring and a cloud target.
        if autoscale.is_some() {
            if bluemix.is_none() {
                debug!("autoscale enabled, forcing cloud target");
                bluemix = Some(BluemixConfig::default());
            }
            metrics = true;
        }

        // CRUD always publishes its schema.
        let host_swagger = self.host_swagger || self.app_type == AppType::Crud;

        self.services.validate()?;
        for model in &self.models {
            model.validate()?;
        }

        Ok(Spec {
            app_type: self.app_type,
            app_name: self.app_name,
            bluemix,
            capabilities: Capabilities { metrics, autoscale },
            services: self.services,
            models: self.models,
            web: self.web,
            host_swagger,
            example_endpoints: self.example_endpoints,
            docker: self.docker,
            crud_service: self.crud_service,
            config: self.config,
        })
    }
}

// ── Tolerant field extraction ────────────────────────────────────────────────

fn require_str<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a str, DomainError> {
    obj.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(DomainError::MissingRequiredField { field })
}

fn bool_field(obj: &Map<String, Value>, field: &str) -> bool {
    obj.get(field).and_then(Value::as_bool).unwrap_or(false)
}

fn str_field(obj: &Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field).and_then(Value::as_str).map(str::to_string)
}

/// `true` becomes the empty config; an object is filtered to recognized
/// sub-keys with matching value types. Anything else means no cloud target.
fn parse_bluemix(raw: Option<&Value>) -> Option<BluemixConfig> {
    match raw {
        Some(Value::Bool(true)) => Some(BluemixConfig::default()),
        Some(Value::Object(obj)) => Some(BluemixConfig {
            name: str_field(obj, "name"),
            host: str_field(obj, "host"),
            domain: str_field(obj, "domain"),
            memory: str_field(obj, "memory"),
            disk_quota: str_field(obj, "diskQuota"),
            instances: obj
                .get("instances")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok()),
        }),
        _ => None,
    }
}

fn parse_service_instance(raw: &Value) -> ServiceInstance {
    let Some(obj) = raw.as_object() else {
        // A non-object instance has no name; Services::validate reports it.
        return ServiceInstance::default();
    };

    let credentials: Credentials = obj
        .get("credentials")
        .and_then(Value::as_object)
        .map(|c| c.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();

    ServiceInstance {
        name: str_field(obj, "name").unwrap_or_default(),
        credentials,
        region: str_field(obj, "region"),
        version: str_field(obj, "version"),
    }
}

fn parse_model(raw: &Value) -> Result<Model, DomainError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| DomainError::InvalidSpec("model entries must be objects".into()))?;

    let name = str_field(obj, "name").unwrap_or_default();
    let mut model = Model::new(&name);
    model.plural = str_field(obj, "plural");
    model.classname = str_field(obj, "classname");

    if let Some(props) = obj.get("properties").and_then(Value::as_object) {
        for (prop_name, raw_def) in props {
            let def = parse_property(&name, prop_name, raw_def)?;
            model.properties.insert(prop_name.clone(), def);
        }
    }

    model.validate()?;
    Ok(model)
}

fn parse_property(model: &str, property: &str, raw: &Value) -> Result<PropertyDef, DomainError> {
    let obj = raw.as_object().ok_or_else(|| DomainError::InvalidModel {
        model: model.to_string(),
        reason: format!("property '{property}' must be an object"),
    })?;

    let type_str = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| DomainError::InvalidModel {
            model: model.to_string(),
            reason: format!("property '{property}' has no type"),
        })?;

    let property_type: PropertyType =
        type_str
            .parse()
            .map_err(|value| DomainError::UnrecognizedPropertyType {
                model: model.to_string(),
                property: property.to_string(),
                value,
            })?;

    Ok(PropertyDef {
        property_type,
        required: bool_field(obj, "required"),
        default: obj.get("default").cloned(),
        id: bool_field(obj, "id"),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_required_fields_fail() {
        let err = SpecBuilder::from_value(json!({"appName": "notes"})).unwrap_err();
        assert!(matches!(
            err,
            DomainError::MissingRequiredField { field: "appType" }
        ));

        let err = SpecBuilder::from_value(json!({"appType": "scaffold"})).unwrap_err();
        assert!(matches!(
            err,
            DomainError::MissingRequiredField { field: "appName" }
        ));
    }

    #[test]
    fn bare_bluemix_true_becomes_empty_config() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "bluemix": true
        }))
        .unwrap();
        assert_eq!(spec.bluemix, Some(BluemixConfig::default()));
    }

    #[test]
    fn bluemix_object_drops_wrong_typed_subkeys() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "bluemix": {"host": "myapp", "memory": 512, "instances": 2}
        }))
        .unwrap();
        let bluemix = spec.bluemix.unwrap();
        assert_eq!(bluemix.host.as_deref(), Some("myapp"));
        // memory was a number, not a string; dropped, not coerced.
        assert_eq!(bluemix.memory, None);
        assert_eq!(bluemix.instances, Some(2));
    }

    #[test]
    fn autoscale_implies_bluemix_and_metrics() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "capabilities": {"autoscale": true}
        }))
        .unwrap();
        assert!(spec.targets_cloud());
        assert!(spec.capabilities.metrics);
        assert_eq!(
            spec.capabilities.autoscale.as_deref(),
            Some("notesScalingService")
        );
    }

    #[test]
    fn explicit_autoscale_name_passes_through() {
        let spec = SpecBuilder::new(AppType::Scaffold, "notes")
            .autoscale_named("customScaler")
            .build()
            .unwrap();
        assert_eq!(spec.capabilities.autoscale.as_deref(), Some("customScaler"));
        assert!(spec.capabilities.metrics);
    }

    #[test]
    fn crud_forces_host_swagger() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "crud",
            "appName": "todo"
        }))
        .unwrap();
        assert!(spec.host_swagger);
    }

    #[test]
    fn unnamed_service_instance_is_fatal() {
        let err = SpecBuilder::from_value(json!({
            "appType": "crud",
            "appName": "todo",
            "services": {"cloudant": [{}]}
        }))
        .unwrap_err();
        assert!(matches!(err, DomainError::ServiceNameMissing { .. }));
    }

    #[test]
    fn service_credentials_default_to_empty_record() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "crud",
            "appName": "todo",
            "services": {"cloudant": [{"name": "db1"}]}
        }))
        .unwrap();
        let (_, instance) = spec.services.iter().next().unwrap();
        assert!(instance.credentials.is_empty());
    }

    #[test]
    fn unknown_service_type_is_fatal() {
        let err = SpecBuilder::from_value(json!({
            "appType": "crud",
            "appName": "todo",
            "services": {"mysql": [{"name": "db1"}]}
        }))
        .unwrap_err();
        assert!(matches!(err, DomainError::UnknownServiceType { .. }));
    }

    #[test]
    fn unknown_property_type_is_fatal() {
        let err = SpecBuilder::from_value(json!({
            "appType": "crud",
            "appName": "todo",
            "models": [{"name": "todo", "properties": {"due": {"type": "date"}}}]
        }))
        .unwrap_err();
        assert!(matches!(err, DomainError::UnrecognizedPropertyType { .. }));
    }

    #[test]
    fn models_parse_with_plural_and_properties() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "crud",
            "appName": "todo",
            "models": [{
                "name": "todo",
                "plural": "todos",
                "properties": {
                    "title": {"type": "string", "required": true},
                    "id": {"type": "string", "id": true}
                }
            }]
        }))
        .unwrap();
        let model = &spec.models[0];
        assert_eq!(model.plural.as_deref(), Some("todos"));
        assert_eq!(model.properties.len(), 2);
        assert!(model.properties["title"].required);
        assert!(model.properties["id"].id);
    }

    #[test]
    fn invalid_app_name_is_rejected() {
        let err = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "my app"
        }))
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidAppName { .. }));
    }

    #[test]
    fn config_defaults_and_overrides() {
        let spec = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "config": {"port": 9090}
        }))
        .unwrap();
        assert_eq!(spec.config.port, 9090);
        assert_eq!(spec.config.logger, "helium");
    }

    #[test]
    fn config_port_is_range_checked() {
        let err = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "config": {"port": 80}
        }))
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidPort { .. }));

        let err = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "config": {"port": 70000}
        }))
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidPort { .. }));

        // String ports are validated, not dropped.
        let spec = SpecBuilder::from_value(json!({
            "appType": "scaffold",
            "appName": "notes",
            "config": {"port": "9090"}
        }))
        .unwrap();
        assert_eq!(spec.config.port, 9090);
    }

    #[test]
    fn control_characters_in_credentials_are_rejected() {
        let err = SpecBuilder::from_value(json!({
            "appType": "crud",
            "appName": "todo",
            "services": {"cloudant": [{
                "name": "db1",
                "credentials": {"password": "p\nw\"break"}
            }]}
        }))
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidSpec(_)));
    }
}
