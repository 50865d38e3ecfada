//! Model Compiler - derives per-property template metadata from models.
//!
//! Pure and order-preserving. Two distinct total functions over the property
//! type enum live here and must not be conflated: the Swift type name used in
//! generated struct fields, and the serialization accessor vocabulary used by
//! generated extraction code.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::domain::{DomainError, Model, PropertyType};

/// One model with everything the triad templates need derived.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledModel {
    pub name: String,
    pub plural: String,
    pub classname: String,
    pub properties: Vec<CompiledProperty>,
}

impl CompiledModel {
    /// Names of required (non-optional) properties, in property order.
    pub fn required_properties(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|p| !p.optional)
            .map(|p| p.name.as_str())
            .collect()
    }
}

/// One property with its derived metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledProperty {
    pub name: String,
    pub property_type: PropertyType,
    /// Identifier properties are always optional, regardless of `required`.
    pub optional: bool,
    /// Swift type for the generated struct field, `?`-suffixed when optional.
    pub swift_type: String,
    /// Serialization accessor name in the generated extraction code.
    pub accessor: &'static str,
    pub default: Option<Value>,
}

/// Compiles model descriptors into template-ready form.
pub struct ModelCompiler;

impl ModelCompiler {
    /// Compile a model list. Order-preserving; fails on classname collisions.
    pub fn compile(models: &[Model]) -> Result<Vec<CompiledModel>, DomainError> {
        Self::check_classname_collisions(models)?;

        let compiled = models
            .iter()
            .map(|model| {
                debug!(model = %model.name, "compiling model");
                CompiledModel {
                    name: model.name.clone(),
                    plural: model.plural(),
                    classname: model.classname(),
                    properties: model
                        .properties
                        .iter()
                        .map(|(name, def)| {
                            let optional = !def.required || def.id;
                            CompiledProperty {
                                name: name.clone(),
                                property_type: def.property_type,
                                optional,
                                swift_type: swift_type_of(def.property_type, optional),
                                accessor: accessor_of(def.property_type),
                                default: def.default.clone(),
                            }
                        })
                        .collect(),
                }
            })
            .collect();

        Ok(compiled)
    }

    /// Distinct model names deriving the same classname are a defect, not
    /// silently tolerated.
    fn check_classname_collisions(models: &[Model]) -> Result<(), DomainError> {
        let mut seen: BTreeMap<String, &str> = BTreeMap::new();
        for model in models {
            let classname = model.classname();
            if let Some(first) = seen.get(&classname) {
                return Err(DomainError::ClassnameCollision {
                    first: (*first).to_string(),
                    second: model.name.clone(),
                    classname,
                });
            }
            seen.insert(classname, &model.name);
        }
        Ok(())
    }
}

/// Swift type for a property, `?`-suffixed when optional.
pub fn swift_type_of(property_type: PropertyType, optional: bool) -> String {
    let base = match property_type {
        PropertyType::String => "String",
        PropertyType::Number => "Double",
        PropertyType::Boolean => "Bool",
        PropertyType::Object => "Any",
        PropertyType::Array => "[Any]",
    };
    if optional {
        format!("{base}?")
    } else {
        base.to_string()
    }
}

/// Serialization accessor name for a property type.
///
/// Independent of [`swift_type_of`]; the accessor vocabulary belongs to the
/// generated extraction code, not the type system.
pub fn accessor_of(property_type: PropertyType) -> &'static str {
    match property_type {
        PropertyType::String => "string",
        PropertyType::Number => "double",
        PropertyType::Boolean => "bool",
        PropertyType::Object => "object",
        PropertyType::Array => "arrayObject",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PropertyDef;

    fn prop(property_type: PropertyType, required: bool, id: bool) -> PropertyDef {
        PropertyDef {
            property_type,
            required,
            default: None,
            id,
        }
    }

    #[test]
    fn id_properties_are_always_optional() {
        let model = Model::new("todo")
            .with_property("id", prop(PropertyType::String, true, true))
            .with_property("title", prop(PropertyType::String, true, false));

        let compiled = ModelCompiler::compile(&[model]).unwrap();
        let props = &compiled[0].properties;

        let id = props.iter().find(|p| p.name == "id").unwrap();
        assert!(id.optional);
        assert_eq!(id.swift_type, "String?");

        let title = props.iter().find(|p| p.name == "title").unwrap();
        assert!(!title.optional);
        assert_eq!(title.swift_type, "String");
    }

    #[test]
    fn type_mapping_is_total_over_the_enum() {
        assert_eq!(swift_type_of(PropertyType::Number, false), "Double");
        assert_eq!(swift_type_of(PropertyType::Boolean, true), "Bool?");
        assert_eq!(swift_type_of(PropertyType::Object, false), "Any");
        assert_eq!(swift_type_of(PropertyType::Array, true), "[Any]?");
    }

    #[test]
    fn accessor_mapping_is_its_own_vocabulary() {
        assert_eq!(accessor_of(PropertyType::Boolean), "bool");
        assert_eq!(accessor_of(PropertyType::Array), "arrayObject");
        assert_eq!(accessor_of(PropertyType::Number), "double");
    }

    #[test]
    fn compile_preserves_model_order() {
        let models = vec![Model::new("zebra"), Model::new("alpha")];
        let compiled = ModelCompiler::compile(&models).unwrap();
        assert_eq!(compiled[0].name, "zebra");
        assert_eq!(compiled[1].name, "alpha");
    }

    #[test]
    fn colliding_classnames_are_a_defect() {
        let models = vec![Model::new("my-model"), Model::new("my_model")];
        let err = ModelCompiler::compile(&models).unwrap_err();
        assert!(matches!(
            err,
            DomainError::ClassnameCollision { ref classname, .. } if classname == "My_model"
        ));
    }

    #[test]
    fn required_properties_excludes_optional_and_id() {
        let model = Model::new("todo")
            .with_property("id", prop(PropertyType::String, true, true))
            .with_property("note", prop(PropertyType::String, false, false))
            .with_property("title", prop(PropertyType::String, true, false));

        let compiled = ModelCompiler::compile(&[model]).unwrap();
        assert_eq!(compiled[0].required_properties(), vec!["title"]);
    }
}
