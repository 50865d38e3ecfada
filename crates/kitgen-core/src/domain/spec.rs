//! The normalized `Spec` aggregate and its parts.
//!
//! A `Spec` is the fully-validated description of the project to generate.
//! It is built once by the spec builder and threaded by value through every
//! downstream component; nothing mutates it after construction.
//!
//! # Normalized representations
//!
//! Two shapes that were ambiguous in raw input are fixed here:
//!
//! - `bluemix` is always `Option<BluemixConfig>`; a bare `true` in raw input
//!   becomes the empty config at the builder boundary.
//! - `autoscale` is always `Option<String>` naming the scaling service; a
//!   bare opt-in gets the derived `{appName}ScalingService` name.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::model::Model;
use crate::domain::registry::{Credentials, ServiceType};
use crate::domain::validation::InputValidator;

// ── AppType ──────────────────────────────────────────────────────────────────

/// The kind of application to generate. Immutable once set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    Scaffold,
    Crud,
}

impl AppType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scaffold => "scaffold",
            Self::Crud => "crud",
        }
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scaffold" => Ok(Self::Scaffold),
            "crud" => Ok(Self::Crud),
            other => Err(DomainError::InvalidSpec(format!(
                "unknown appType: {other}"
            ))),
        }
    }
}

// ── Cloud deployment target ──────────────────────────────────────────────────

/// Cloud deployment settings. Present at all when the spec targets the
/// cloud; every field individually optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BluemixConfig {
    pub name: Option<String>,
    pub host: Option<String>,
    pub domain: Option<String>,
    pub memory: Option<String>,
    #[serde(rename = "diskQuota")]
    pub disk_quota: Option<String>,
    pub instances: Option<u32>,
}

impl BluemixConfig {
    /// Whether meaningful host/domain values were supplied.
    ///
    /// Only then does the deployment manifest pin a route; otherwise the
    /// platform assigns a random route.
    pub fn has_route(&self) -> bool {
        self.host.as_deref().is_some_and(|h| !h.is_empty())
            && self.domain.as_deref().is_some_and(|d| !d.is_empty())
    }
}

// ── Capabilities ─────────────────────────────────────────────────────────────

/// Cross-cutting feature toggles independent of any single service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub metrics: bool,
    /// Name of the auto-scaling service instance, when enabled.
    /// Invariant (enforced by the spec builder): `Some` implies `metrics`
    /// and a cloud target.
    #[serde(default)]
    pub autoscale: Option<String>,
}

// ── Service instances ────────────────────────────────────────────────────────

/// One configured backing service declared in a spec.
///
/// Credentials here are the raw declared values; defaults are injected into
/// a fresh copy at composition time, never written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstance {
    pub name: String,
    #[serde(default)]
    pub credentials: Credentials,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// All declared services, keyed by type.
///
/// A `BTreeMap` over [`ServiceType`] iterates in canonical registry order,
/// which is what makes composition reproducible regardless of declaration
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Services(pub BTreeMap<ServiceType, Vec<ServiceInstance>>);

impl Services {
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| v.is_empty())
    }

    /// Iterate (type, instance) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ServiceType, &ServiceInstance)> {
        self.0
            .iter()
            .flat_map(|(ty, instances)| instances.iter().map(move |i| (*ty, i)))
    }

    /// Resolve an instance name to its service type.
    pub fn resolve(&self, name: &str) -> Option<ServiceType> {
        self.iter()
            .find(|(_, instance)| instance.name == name)
            .map(|(ty, _)| ty)
    }

    pub fn push(&mut self, service_type: ServiceType, instance: ServiceInstance) {
        self.0.entry(service_type).or_default().push(instance);
    }

    /// Check the structural invariants: every instance named, names unique,
    /// credential strings free of control characters. Credential values are
    /// interpolated into generated source, so a bad one is fatal here, not
    /// at render time.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for (ty, instance) in self.iter() {
            if instance.name.is_empty() {
                return Err(DomainError::ServiceNameMissing {
                    service_type: ty.to_string(),
                });
            }
            if !seen.insert(instance.name.clone()) {
                return Err(DomainError::DuplicateServiceName {
                    name: instance.name.clone(),
                });
            }
            for value in instance.credentials.values() {
                if let Some(raw) = value.as_str() {
                    InputValidator::validate_credential(raw)?;
                }
            }
        }
        Ok(())
    }
}

// ── Runtime config passthrough ───────────────────────────────────────────────

/// Passthrough runtime defaults for the generated application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub logger: String,
    pub port: u16,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            logger: "helium".into(),
            port: 8080,
        }
    }
}

// ── Spec ─────────────────────────────────────────────────────────────────────

/// The root record driving generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spec {
    #[serde(rename = "appType")]
    pub app_type: AppType,
    #[serde(rename = "appName")]
    pub app_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bluemix: Option<BluemixConfig>,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default)]
    pub services: Services,
    #[serde(default)]
    pub models: Vec<Model>,
    #[serde(default)]
    pub web: bool,
    #[serde(rename = "hostSwagger", default)]
    pub host_swagger: bool,
    #[serde(rename = "exampleEndpoints", default)]
    pub example_endpoints: bool,
    #[serde(default)]
    pub docker: bool,
    #[serde(rename = "crudservice", skip_serializing_if = "Option::is_none")]
    pub crud_service: Option<String>,
    #[serde(default)]
    pub config: RuntimeConfig,
}

impl Spec {
    /// Whether the spec targets a cloud deployment.
    pub fn targets_cloud(&self) -> bool {
        self.bluemix.is_some()
    }

    /// Resolve `crudservice` to the backing service type, or `None` for the
    /// in-memory store. An unresolvable name is fatal.
    pub fn crud_store(&self) -> Result<Option<ServiceType>, DomainError> {
        match &self.crud_service {
            None => Ok(None),
            Some(name) => self
                .services
                .resolve(name)
                .map(Some)
                .ok_or_else(|| DomainError::UnknownCrudService { name: name.clone() }),
        }
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.app_name, self.app_type)?;
        if self.targets_cloud() {
            write!(f, " [cloud]")?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> ServiceInstance {
        ServiceInstance {
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn app_type_round_trips() {
        assert_eq!("crud".parse::<AppType>().unwrap(), AppType::Crud);
        assert_eq!(AppType::Scaffold.to_string(), "scaffold");
        assert!("webapp".parse::<AppType>().is_err());
    }

    #[test]
    fn services_iterate_in_canonical_order() {
        let mut services = Services::default();
        // Declared out of canonical order on purpose.
        services.push(ServiceType::Redis, named("r1"));
        services.push(ServiceType::Cloudant, named("c1"));
        services.push(ServiceType::Cloudant, named("c2"));

        let order: Vec<_> = services.iter().map(|(_, i)| i.name.as_str()).collect();
        assert_eq!(order, vec!["c1", "c2", "r1"]);
    }

    #[test]
    fn resolve_finds_instance_by_name() {
        let mut services = Services::default();
        services.push(ServiceType::Cloudant, named("db1"));
        assert_eq!(services.resolve("db1"), Some(ServiceType::Cloudant));
        assert_eq!(services.resolve("nope"), None);
    }

    #[test]
    fn unnamed_instance_is_fatal() {
        let mut services = Services::default();
        services.push(ServiceType::Cloudant, ServiceInstance::default());
        assert!(matches!(
            services.validate(),
            Err(DomainError::ServiceNameMissing { .. })
        ));
    }

    #[test]
    fn duplicate_names_are_fatal_across_types() {
        let mut services = Services::default();
        services.push(ServiceType::Cloudant, named("shared"));
        services.push(ServiceType::Redis, named("shared"));
        assert!(matches!(
            services.validate(),
            Err(DomainError::DuplicateServiceName { .. })
        ));
    }

    #[test]
    fn control_characters_in_credentials_are_fatal() {
        let mut instance = named("db1");
        instance.credentials.insert(
            "password".into(),
            serde_json::Value::String("p\nw\"break".into()),
        );
        let mut services = Services::default();
        services.push(ServiceType::Cloudant, instance);
        assert!(matches!(
            services.validate(),
            Err(DomainError::InvalidSpec(_))
        ));
    }

    #[test]
    fn bluemix_route_requires_both_host_and_domain() {
        let mut cfg = BluemixConfig::default();
        assert!(!cfg.has_route());
        cfg.host = Some("myapp".into());
        assert!(!cfg.has_route());
        cfg.domain = Some("example.com".into());
        assert!(cfg.has_route());
        cfg.host = Some(String::new());
        assert!(!cfg.has_route());
    }

    #[test]
    fn crud_store_resolves_or_fails() {
        let mut services = Services::default();
        services.push(ServiceType::Cloudant, named("db1"));
        let spec = Spec {
            app_type: AppType::Crud,
            app_name: "todo".into(),
            bluemix: None,
            capabilities: Capabilities::default(),
            services,
            models: Vec::new(),
            web: false,
            host_swagger: true,
            example_endpoints: false,
            docker: false,
            crud_service: Some("db1".into()),
            config: RuntimeConfig::default(),
        };
        assert_eq!(spec.crud_store().unwrap(), Some(ServiceType::Cloudant));

        let mut dangling = spec.clone();
        dangling.crud_service = Some("ghost".into());
        assert!(matches!(
            dangling.crud_store(),
            Err(DomainError::UnknownCrudService { .. })
        ));

        let mut memory = spec;
        memory.crud_service = None;
        assert_eq!(memory.crud_store().unwrap(), None);
    }

    #[test]
    fn runtime_config_defaults() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.logger, "helium");
    }
}
