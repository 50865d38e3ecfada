//! Data-model descriptors and the Swift classname derivation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::DomainError;

// ── Property types ───────────────────────────────────────────────────────────

/// The closed set of property types a model may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl PropertyType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            other => Err(other.to_string()),
        }
    }
}

// ── Property definition ──────────────────────────────────────────────────────

/// One property of a data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Identifier properties are always optional in generated accessors,
    /// regardless of `required` — they are assigned post-creation.
    #[serde(default)]
    pub id: bool,
}

// ── Model ────────────────────────────────────────────────────────────────────

/// One data-model descriptor.
///
/// `plural` and `classname` may be supplied explicitly; both have
/// deterministic derivations from `name` when absent. Properties are kept in
/// a `BTreeMap` so every downstream iteration is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classname: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDef>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plural: None,
            classname: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, def: PropertyDef) -> Self {
        self.properties.insert(name.into(), def);
        self
    }

    /// Collection name: explicit plural or `{name}s`.
    pub fn plural(&self) -> String {
        self.plural.clone().unwrap_or_else(|| format!("{}s", self.name))
    }

    /// Swift classname: explicit value or derived from `name`.
    pub fn classname(&self) -> String {
        self.classname
            .clone()
            .unwrap_or_else(|| swift_classname(&self.name))
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.is_empty() {
            return Err(DomainError::InvalidModel {
                model: self.name.clone(),
                reason: "model name cannot be empty".into(),
            });
        }
        Ok(())
    }
}

// ── Classname derivation ─────────────────────────────────────────────────────

/// Swift keywords that cannot be used as type names.
const SWIFT_RESERVED: &[&str] = &[
    "any", "as", "associatedtype", "break", "case", "catch", "class", "continue", "default",
    "defer", "deinit", "do", "else", "enum", "extension", "fallthrough", "false", "fileprivate",
    "for", "func", "guard", "if", "import", "in", "init", "inout", "internal", "is", "let",
    "nil", "open", "operator", "private", "protocol", "public", "repeat", "rethrows", "return",
    "self", "static", "struct", "subscript", "super", "switch", "throw", "throws", "true", "try",
    "typealias", "var", "where", "while",
];

/// Derive a Swift classname from a model name.
///
/// Pure and collision-resistant by construction within its rules:
/// - the first letter is uppercased
/// - characters that are not valid in a Swift identifier become `_`
/// - a name whose derivation matches a reserved word gets a `0` suffix
///
/// Distinct names that still collide (e.g. `my-model` vs `my_model`) are a
/// defect surfaced by the model compiler, not silently tolerated here.
pub fn swift_classname(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    let mut chars = sanitized.chars();
    let mut classname = match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    };

    if SWIFT_RESERVED.contains(&classname.to_ascii_lowercase().as_str()) {
        classname.push('0');
    }

    classname
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classname_capitalizes_and_substitutes() {
        assert_eq!(swift_classname("my-model"), "My_model");
        assert_eq!(swift_classname("todo"), "Todo");
        assert_eq!(swift_classname("order item"), "Order_item");
    }

    #[test]
    fn reserved_word_gets_zero_suffix() {
        assert_eq!(swift_classname("class"), "Class0");
        assert_eq!(swift_classname("struct"), "Struct0");
    }

    #[test]
    fn already_valid_names_pass_through() {
        assert_eq!(swift_classname("Invoice"), "Invoice");
        assert_eq!(swift_classname("line_item"), "Line_item");
    }

    #[test]
    fn plural_defaults_to_name_plus_s() {
        assert_eq!(Model::new("todo").plural(), "todos");
        let explicit = Model {
            plural: Some("people".into()),
            ..Model::new("person")
        };
        assert_eq!(explicit.plural(), "people");
    }

    #[test]
    fn explicit_classname_wins_over_derivation() {
        let model = Model {
            classname: Some("TodoItem".into()),
            ..Model::new("todo")
        };
        assert_eq!(model.classname(), "TodoItem");
    }

    #[test]
    fn property_type_parses_known_values_only() {
        assert_eq!("string".parse::<PropertyType>().unwrap(), PropertyType::String);
        assert_eq!("ARRAY".parse::<PropertyType>().unwrap(), PropertyType::Array);
        assert!("date".parse::<PropertyType>().is_err());
    }

    #[test]
    fn empty_model_name_is_invalid() {
        assert!(Model::new("").validate().is_err());
        assert!(Model::new("todo").validate().is_ok());
    }
}
