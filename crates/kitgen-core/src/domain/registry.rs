//! Backing-service registry.
//!
//! # Design Rationale
//!
//! The previous design scattered per-service knowledge across string-keyed
//! switch statements in many functions: one for labels, one for plans, one
//! for credential defaults, one for code fragments. This module replaces
//! that with a single static registry: each service type is described
//! exactly once by its [`ServiceDef`]. All lookups are O(n) table scans over
//! a list of eight entries.
//!
//! # Adding a New Service Type
//!
//! 1. Add a variant to [`ServiceType`]
//! 2. Add one [`ServiceDef`] entry to [`SERVICE_REGISTRY`]
//! 3. That's it — labels, plans, credentials, fragments, and package
//!    dependencies all derive from the entry
//!
//! # Canonical order
//!
//! [`SERVICE_REGISTRY`] order is the canonical service iteration order used
//! by the composition engine, so generated output is reproducible regardless
//! of the order the user declared services in. [`ServiceType`]'s derived
//! `Ord` matches the registry order; the `registry_is_internally_consistent`
//! test enforces that.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::DomainError;

/// Credential record for one service instance.
///
/// A `BTreeMap` so iteration (and therefore anything rendered from it) is
/// deterministic.
pub type Credentials = BTreeMap<String, Value>;

// ── Service types ────────────────────────────────────────────────────────────

/// A supported backing-service type.
///
/// Variant order is the canonical composition order; do not reorder without
/// understanding that generated bootstrap files will change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Cloudant,
    Redis,
    #[serde(rename = "objectstorage")]
    ObjectStorage,
    #[serde(rename = "appid")]
    AppId,
    #[serde(rename = "watsonconversation")]
    WatsonConversation,
    #[serde(rename = "alertnotification")]
    AlertNotification,
    #[serde(rename = "pushnotifications")]
    PushNotifications,
    #[serde(rename = "autoscaling")]
    AutoScaling,
}

impl ServiceType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cloudant => "cloudant",
            Self::Redis => "redis",
            Self::ObjectStorage => "objectstorage",
            Self::AppId => "appid",
            Self::WatsonConversation => "watsonconversation",
            Self::AlertNotification => "alertnotification",
            Self::PushNotifications => "pushnotifications",
            Self::AutoScaling => "autoscaling",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cloudant" => Ok(Self::Cloudant),
            "redis" => Ok(Self::Redis),
            "objectstorage" => Ok(Self::ObjectStorage),
            "appid" => Ok(Self::AppId),
            "watsonconversation" => Ok(Self::WatsonConversation),
            "alertnotification" => Ok(Self::AlertNotification),
            "pushnotifications" => Ok(Self::PushNotifications),
            "autoscaling" => Ok(Self::AutoScaling),
            other => Err(DomainError::UnknownServiceType {
                value: other.to_string(),
            }),
        }
    }
}

// ── Package dependencies ─────────────────────────────────────────────────────

/// One Swift package manifest dependency.
///
/// Ordering is by `name` first, which gives the stable sorted order the
/// manifest emits dependencies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageDependency {
    pub name: &'static str,
    pub url: &'static str,
    pub major_version: &'static str,
}

// ── Credential defaults ──────────────────────────────────────────────────────

/// A static default credential value.
#[derive(Debug, Clone, Copy)]
pub enum CredentialDefault {
    Str(&'static str),
    Num(i64),
    Bool(bool),
}

impl CredentialDefault {
    fn to_value(self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.to_string()),
            Self::Num(n) => Value::from(n),
            Self::Bool(b) => Value::Bool(b),
        }
    }
}

// ── Service definitions ──────────────────────────────────────────────────────

/// Describes everything the generator needs to know about one service type.
#[derive(Debug, Clone, Copy)]
pub struct ServiceDef {
    /// The service type this entry describes.
    pub service_type: ServiceType,

    /// Cloud catalog label used in the deployment manifest.
    pub label: &'static str,

    /// Cloud catalog plan used when the spec names none.
    pub default_plan: &'static str,

    /// Whether a spec may declare more than one instance of this type.
    pub supports_multiple: bool,

    /// Package manifest dependency this service pulls in, if any.
    /// `AutoScaling` has none of its own; its code ships with the metrics
    /// capability dependency.
    pub dependency: Option<PackageDependency>,

    /// Bootstrap import statements required by the local flavor.
    pub imports: &'static [&'static str],

    /// Additional imports required only by the cloud flavor.
    pub cloud_imports: &'static [&'static str],

    /// Default credential shape. Keys absent here are never URL-derived.
    pub credential_defaults: &'static [(&'static str, CredentialDefault)],

    /// Declared-variable fragment for the bootstrap file.
    /// `{{name}}` and `{{type}}` are resolved by the composition engine.
    pub variable_fragment: &'static str,

    /// Connection/initializer fragment used when no cloud target is set.
    pub local_initializer: &'static str,

    /// Connection/initializer fragment used when the spec targets the cloud.
    pub cloud_initializer: &'static str,
}

/// Single source of truth for all service-type capabilities.
pub static SERVICE_REGISTRY: &[ServiceDef] = &[
    ServiceDef {
        service_type: ServiceType::Cloudant,
        label: "cloudantNoSQLDB",
        default_plan: "Lite",
        supports_multiple: true,
        dependency: Some(PackageDependency {
            name: "CouchDB",
            url: "https://github.com/Kitura/Kitura-CouchDB.git",
            major_version: "3",
        }),
        imports: &["CouchDB"],
        cloud_imports: &["CloudEnvironment"],
        credential_defaults: &[
            ("host", CredentialDefault::Str("localhost")),
            ("port", CredentialDefault::Num(5984)),
            ("secured", CredentialDefault::Bool(false)),
            ("username", CredentialDefault::Str("")),
            ("password", CredentialDefault::Str("")),
        ],
        variable_fragment: "internal var couchDBClient: CouchDBClient?",
        local_initializer: r#"let couchDBConnProps = ConnectionProperties(host: "{{host}}", port: {{port}}, secured: {{secured}}, username: "{{username}}", password: "{{password}}")
couchDBClient = CouchDBClient(connectionProperties: couchDBConnProps)"#,
        cloud_initializer: r#"let cloudantCredentials = try cloudEnv.getCloudantCredentials(name: "{{name}}")
couchDBClient = CouchDBClient(connectionProperties: ConnectionProperties(host: cloudantCredentials.host, port: Int16(cloudantCredentials.port), secured: cloudantCredentials.secured, username: cloudantCredentials.username, password: cloudantCredentials.password))"#,
    },
    ServiceDef {
        service_type: ServiceType::Redis,
        label: "compose-for-redis",
        default_plan: "Standard",
        supports_multiple: false,
        dependency: Some(PackageDependency {
            name: "KituraRedis",
            url: "https://github.com/Kitura/Kitura-redis.git",
            major_version: "2",
        }),
        imports: &["SwiftRedis"],
        cloud_imports: &["CloudEnvironment"],
        credential_defaults: &[
            ("host", CredentialDefault::Str("localhost")),
            ("port", CredentialDefault::Num(6379)),
            ("password", CredentialDefault::Str("")),
        ],
        variable_fragment: "internal var redis: Redis?",
        local_initializer: r#"redis = Redis()
redis?.connect(host: "{{host}}", port: {{port}}) { _ in }"#,
        cloud_initializer: r#"let redisCredentials = try cloudEnv.getRedisCredentials(name: "{{name}}")
redis = Redis()
redis?.connect(host: redisCredentials.host, port: Int32(redisCredentials.port)) { _ in }"#,
    },
    ServiceDef {
        service_type: ServiceType::ObjectStorage,
        label: "Object-Storage",
        default_plan: "Free",
        supports_multiple: true,
        dependency: Some(PackageDependency {
            name: "BluemixObjectStorage",
            url: "https://github.com/ibm-bluemix-mobile-services/bluemix-objectstorage-serversdk-swift.git",
            major_version: "0",
        }),
        imports: &["BluemixObjectStorage"],
        cloud_imports: &["CloudEnvironment"],
        credential_defaults: &[
            ("region", CredentialDefault::Str("dallas")),
            ("projectId", CredentialDefault::Str("")),
            ("userId", CredentialDefault::Str("")),
            ("password", CredentialDefault::Str("")),
        ],
        variable_fragment: "internal var objectStorage: ObjectStorage?",
        local_initializer: r#"objectStorage = ObjectStorage(projectId: "{{projectId}}")
objectStorage?.connect(userId: "{{userId}}", password: "{{password}}", region: "{{region}}") { _ in }"#,
        cloud_initializer: r#"let objectStorageCredentials = try cloudEnv.getObjectStorageCredentials(name: "{{name}}")
objectStorage = ObjectStorage(projectId: objectStorageCredentials.projectID)
objectStorage?.connect(userId: objectStorageCredentials.userID, password: objectStorageCredentials.password, region: objectStorageCredentials.region) { _ in }"#,
    },
    ServiceDef {
        service_type: ServiceType::AppId,
        label: "AppID",
        default_plan: "Graduated tier",
        supports_multiple: false,
        dependency: Some(PackageDependency {
            name: "BluemixAppID",
            url: "https://github.com/ibm-cloud-security/appid-serversdk-swift.git",
            major_version: "4",
        }),
        imports: &["BluemixAppID", "Credentials"],
        cloud_imports: &["CloudEnvironment"],
        credential_defaults: &[
            ("tenantId", CredentialDefault::Str("")),
            ("clientId", CredentialDefault::Str("")),
            ("secret", CredentialDefault::Str("")),
            ("oauthServerUrl", CredentialDefault::Str("")),
            ("profilesUrl", CredentialDefault::Str("")),
        ],
        variable_fragment: "internal var webCredentialsPlugin: WebAppKituraCredentialsPlugin?",
        local_initializer: r#"let webappKituraOptions: [String: Any] = ["tenantId": "{{tenantId}}", "clientId": "{{clientId}}", "secret": "{{secret}}", "oauthServerUrl": "{{oauthServerUrl}}", "profilesUrl": "{{profilesUrl}}"]
webCredentialsPlugin = WebAppKituraCredentialsPlugin(options: webappKituraOptions)"#,
        cloud_initializer: r#"let appidCredentials = try cloudEnv.getAppIDCredentials(name: "{{name}}")
webCredentialsPlugin = WebAppKituraCredentialsPlugin(options: ["tenantId": appidCredentials.tenantId, "clientId": appidCredentials.clientId, "secret": appidCredentials.secret, "oauthServerUrl": appidCredentials.oauthServerUrl, "profilesUrl": appidCredentials.profilesUrl])"#,
    },
    ServiceDef {
        service_type: ServiceType::WatsonConversation,
        label: "conversation",
        default_plan: "free",
        supports_multiple: true,
        dependency: Some(PackageDependency {
            name: "WatsonDeveloperCloud",
            url: "https://github.com/watson-developer-cloud/swift-sdk.git",
            major_version: "0",
        }),
        imports: &["ConversationV1"],
        cloud_imports: &["CloudEnvironment"],
        credential_defaults: &[
            ("username", CredentialDefault::Str("")),
            ("password", CredentialDefault::Str("")),
            (
                "url",
                CredentialDefault::Str("https://gateway.watsonplatform.net/conversation/api"),
            ),
        ],
        variable_fragment: "internal var conversation: Conversation?",
        local_initializer: r#"conversation = Conversation(username: "{{username}}", password: "{{password}}", version: "2018-02-16")"#,
        cloud_initializer: r#"let conversationCredentials = try cloudEnv.getWatsonConversationCredentials(name: "{{name}}")
conversation = Conversation(username: conversationCredentials.username, password: conversationCredentials.password, version: "2018-02-16")"#,
    },
    ServiceDef {
        service_type: ServiceType::AlertNotification,
        label: "AlertNotification",
        default_plan: "authorizedusers",
        supports_multiple: true,
        dependency: Some(PackageDependency {
            name: "AlertNotifications",
            url: "https://github.com/IBM-Swift/alert-notification-sdk-swift.git",
            major_version: "1",
        }),
        imports: &["AlertNotifications"],
        cloud_imports: &["CloudEnvironment"],
        credential_defaults: &[
            ("name", CredentialDefault::Str("")),
            ("password", CredentialDefault::Str("")),
            ("url", CredentialDefault::Str("")),
        ],
        variable_fragment: "internal var alertNotificationServiceCredentials: ServiceCredentials?",
        local_initializer: r#"alertNotificationServiceCredentials = ServiceCredentials(url: "{{url}}", name: "{{name}}", password: "{{password}}")"#,
        cloud_initializer: r#"let alertCredentials = try cloudEnv.getAlertNotificationCredentials(name: "{{name}}")
alertNotificationServiceCredentials = ServiceCredentials(url: alertCredentials.url, name: alertCredentials.name, password: alertCredentials.password)"#,
    },
    ServiceDef {
        service_type: ServiceType::PushNotifications,
        label: "imfpush",
        default_plan: "lite",
        supports_multiple: false,
        dependency: Some(PackageDependency {
            name: "BluemixPushNotifications",
            url: "https://github.com/ibm-bluemix-mobile-services/bluemix-pushnotifications-swift-sdk.git",
            major_version: "0",
        }),
        imports: &["BluemixPushNotifications"],
        cloud_imports: &["CloudEnvironment"],
        credential_defaults: &[
            ("appGuid", CredentialDefault::Str("")),
            ("appSecret", CredentialDefault::Str("")),
            ("region", CredentialDefault::Str(".ng.bluemix.net")),
        ],
        variable_fragment: "internal var pushNotifications: PushNotifications?",
        local_initializer: r#"pushNotifications = PushNotifications(bluemixRegion: "{{region}}", bluemixAppGuid: "{{appGuid}}", bluemixAppSecret: "{{appSecret}}")"#,
        cloud_initializer: r#"let pushCredentials = try cloudEnv.getPushSDKCredentials(name: "{{name}}")
pushNotifications = PushNotifications(bluemixRegion: pushCredentials.region, bluemixAppGuid: pushCredentials.appGuid, bluemixAppSecret: pushCredentials.appSecret)"#,
    },
    ServiceDef {
        service_type: ServiceType::AutoScaling,
        label: "Auto-Scaling",
        default_plan: "free",
        supports_multiple: false,
        // Auto-scaling code ships with the SwiftMetrics capability dependency.
        dependency: None,
        imports: &[],
        cloud_imports: &[],
        credential_defaults: &[],
        variable_fragment: "",
        local_initializer: "",
        cloud_initializer: "",
    },
];

// ── Registry lookup API ───────────────────────────────────────────────────────
//
// These functions are the ONLY entry points for service-type queries.
// Do not write `match` arms on service types elsewhere.

/// Find the definition for a service type.
///
/// Total over [`ServiceType`]: every variant has a registry entry, enforced
/// by the `registry_is_internally_consistent` test. The `expect` here can
/// only fire if the registry and the enum fall out of sync, which is a
/// development-time defect, never a user error.
pub fn lookup(service_type: ServiceType) -> &'static ServiceDef {
    SERVICE_REGISTRY
        .iter()
        .find(|def| def.service_type == service_type)
        .expect("every ServiceType has a registry entry")
}

/// Cloud catalog label for a service-type key.
///
/// Total over arbitrary strings: unknown-but-passed-through keys (reachable
/// via externally supplied spec JSON) fall back to the key itself rather
/// than failing.
pub fn bluemix_service_label(service_type: &str) -> String {
    service_type
        .parse::<ServiceType>()
        .map(|t| lookup(t).label.to_string())
        .unwrap_or_else(|_| service_type.to_string())
}

/// Cloud catalog plan for a service-type key; `"Lite"` for unknown keys.
pub fn bluemix_default_plan(service_type: &str) -> String {
    service_type
        .parse::<ServiceType>()
        .map(|t| lookup(t).default_plan.to_string())
        .unwrap_or_else(|_| "Lite".to_string())
}

// ── Credential defaulting ─────────────────────────────────────────────────────

/// Fill a possibly-partial credential record to the full shape for its type.
///
/// Precedence, highest first, identical for every service type:
///
/// 1. explicit field in `raw`
/// 2. component derived from a `url` field in `raw`
/// 3. static default from the registry
///
/// URL components only land in keys the service's default shape declares;
/// a service without a `port` key never grows one from a URL. The input is
/// never mutated; a fresh record is returned.
pub fn credential_defaults(service_type: ServiceType, raw: &Credentials) -> Credentials {
    let def = lookup(service_type);

    let mut out: Credentials = def
        .credential_defaults
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_value()))
        .collect();

    if let Some(Value::String(raw_url)) = raw.get("url") {
        if let Ok(parsed) = url::Url::parse(raw_url) {
            for (key, value) in url_components(&parsed) {
                if out.contains_key(key) {
                    out.insert(key.to_string(), value);
                }
            }
        }
    }

    for (key, value) in raw {
        out.insert(key.clone(), value.clone());
    }

    out
}

/// Break a connection URI into the credential keys it can override.
fn url_components(parsed: &url::Url) -> Vec<(&'static str, Value)> {
    let mut components = Vec::new();
    if let Some(host) = parsed.host_str() {
        components.push(("host", Value::String(host.to_string())));
    }
    if let Some(port) = parsed.port() {
        components.push(("port", Value::from(port)));
    }
    components.push(("secured", Value::Bool(parsed.scheme() == "https")));
    if !parsed.username().is_empty() {
        components.push(("username", Value::String(parsed.username().to_string())));
    }
    if let Some(password) = parsed.password() {
        components.push(("password", Value::String(password.to_string())));
    }
    components
}

// ── Registry integrity (checked in tests) ────────────────────────────────────

/// Assert that the registry is internally consistent.
///
/// Call this in a test; it panics with a clear message on any violation.
/// Catches registration errors at development time, not at user runtime.
#[doc(hidden)]
pub fn assert_registry_integrity() {
    let all = [
        ServiceType::Cloudant,
        ServiceType::Redis,
        ServiceType::ObjectStorage,
        ServiceType::AppId,
        ServiceType::WatsonConversation,
        ServiceType::AlertNotification,
        ServiceType::PushNotifications,
        ServiceType::AutoScaling,
    ];

    assert_eq!(
        SERVICE_REGISTRY.len(),
        all.len(),
        "registry entry count must match ServiceType variant count"
    );

    for (i, ty) in all.iter().enumerate() {
        // Exactly one entry per type, in enum order, so BTreeMap iteration
        // over ServiceType keys matches registry order.
        assert_eq!(
            SERVICE_REGISTRY[i].service_type, *ty,
            "registry order must match ServiceType declaration order"
        );
        assert_eq!(
            SERVICE_REGISTRY
                .iter()
                .filter(|d| d.service_type == *ty)
                .count(),
            1,
            "ServiceType {:?} must have exactly one registry entry",
            ty
        );
        // Round-trip through the string form.
        assert_eq!(ty.as_str().parse::<ServiceType>().unwrap(), *ty);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
