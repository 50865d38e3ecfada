//! Swagger Emitter - derives a Swagger 2.0 document from the model list.
//!
//! Deterministic by construction: definitions and paths follow model list
//! order within serde_json's sorted maps, and operations within a path follow
//! a fixed verb order. The API-gateway flavor is a pure layering pass that
//! adds security boilerplate without touching path or definition content.

use serde_json::{Map, Value, json};

use crate::application::model_compiler::CompiledModel;
use crate::domain::PropertyType;

/// Document-level metadata for the emitted swagger.
#[derive(Debug, Clone)]
pub struct ApiMeta {
    pub title: String,
    pub version: String,
    pub base_path: String,
}

impl ApiMeta {
    pub fn for_app(app_name: &str) -> Self {
        Self {
            title: app_name.to_string(),
            version: "1.0.0".into(),
            base_path: "/api".into(),
        }
    }
}

/// Emits Swagger 2.0 documents for CRUD models.
pub struct SwaggerEmitter;

impl SwaggerEmitter {
    /// Emit the base document: one definition per model, a collection path
    /// and a single-resource path per model.
    pub fn emit(models: &[CompiledModel], meta: &ApiMeta) -> Value {
        let mut definitions = Map::new();
        let mut paths = Map::new();

        for model in models {
            definitions.insert(model.classname.clone(), definition_for(model));

            let collection = format!("/{}", model.plural);
            let single = format!("/{}/{{id}}", model.plural);
            paths.insert(collection, collection_path(model));
            paths.insert(single, single_resource_path(model));
        }

        json!({
            "swagger": "2.0",
            "info": {
                "title": meta.title,
                "version": meta.version
            },
            "basePath": meta.base_path,
            "consumes": ["application/json"],
            "produces": ["application/json"],
            "definitions": Value::Object(definitions),
            "paths": Value::Object(paths)
        })
    }

    /// Layer API-gateway boilerplate over a base document.
    ///
    /// Takes the document by value and returns a new one; the paths and
    /// definitions of the input appear unchanged in the output.
    pub fn with_api_gateway(mut doc: Value) -> Value {
        let Some(obj) = doc.as_object_mut() else {
            return doc;
        };

        obj.insert(
            "securityDefinitions".into(),
            json!({
                "client_id": {
                    "type": "apiKey",
                    "name": "X-IBM-Client-Id",
                    "in": "header"
                }
            }),
        );
        obj.insert("security".into(), json!([{"client_id": []}]));
        obj.insert(
            "x-ibm-configuration".into(),
            json!({
                "enforced": true,
                "testable": true,
                "phase": "realized",
                "assembly": {
                    "execute": [{"proxy": {"target-url": "$(target-url)$(api.operation.path)"}}]
                }
            }),
        );

        doc
    }
}

fn swagger_type(property_type: PropertyType) -> &'static str {
    match property_type {
        PropertyType::String => "string",
        PropertyType::Number => "number",
        PropertyType::Boolean => "boolean",
        PropertyType::Object => "object",
        PropertyType::Array => "array",
    }
}

fn definition_for(model: &CompiledModel) -> Value {
    let mut properties = Map::new();
    for prop in &model.properties {
        let mut schema = Map::new();
        schema.insert("type".into(), json!(swagger_type(prop.property_type)));
        if prop.property_type == PropertyType::Array {
            schema.insert("items".into(), json!({"type": "object"}));
        }
        if let Some(default) = &prop.default {
            schema.insert("default".into(), default.clone());
        }
        properties.insert(prop.name.clone(), Value::Object(schema));
    }

    let required = model.required_properties();

    let mut definition = Map::new();
    definition.insert("type".into(), json!("object"));
    definition.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        definition.insert("required".into(), json!(required));
    }
    Value::Object(definition)
}

fn model_ref(model: &CompiledModel) -> Value {
    json!({"$ref": format!("#/definitions/{}", model.classname)})
}

fn operation(model: &CompiledModel, alias: &str, responses: Value) -> Value {
    json!({
        "tags": [model.name],
        "operationId": format!("{}.{}", model.name, alias),
        "responses": responses
    })
}

fn id_parameter() -> Value {
    json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "type": "string"
    }])
}

fn body_parameter(model: &CompiledModel) -> Value {
    json!([{
        "name": "data",
        "in": "body",
        "required": true,
        "schema": model_ref(model)
    }])
}

/// Fixed verb order: POST create, GET findAll, DELETE deleteAll.
fn collection_path(model: &CompiledModel) -> Value {
    let mut post = operation(
        model,
        "create",
        json!({"200": {"description": "Model instance data", "schema": model_ref(model)}}),
    );
    post["parameters"] = body_parameter(model);

    let get = operation(
        model,
        "findAll",
        json!({"200": {
            "description": "Array of model instances",
            "schema": {"type": "array", "items": model_ref(model)}
        }}),
    );

    let delete = operation(model, "deleteAll", json!({"200": {"description": "Deleted all"}}));

    json!({"post": post, "get": get, "delete": delete})
}

/// Fixed verb order: GET findOne, PUT replace, PATCH update, DELETE delete.
fn single_resource_path(model: &CompiledModel) -> Value {
    let ok = json!({"200": {"description": "Model instance data", "schema": model_ref(model)}});

    let mut get = operation(model, "findOne", ok.clone());
    get["parameters"] = id_parameter();

    let mut put = operation(model, "replace", ok.clone());
    put["parameters"] = json!([
        id_parameter()[0].clone(),
        body_parameter(model)[0].clone()
    ]);

    let mut patch = operation(model, "update", ok);
    patch["parameters"] = json!([
        id_parameter()[0].clone(),
        body_parameter(model)[0].clone()
    ]);

    let mut delete = operation(model, "delete", json!({"200": {"description": "Deleted"}}));
    delete["parameters"] = id_parameter();

    json!({"get": get, "put": put, "patch": patch, "delete": delete})
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::model_compiler::ModelCompiler;
    use crate::domain::{Model, PropertyDef};

    fn compiled(names: &[&str]) -> Vec<CompiledModel> {
        let models: Vec<Model> = names
            .iter()
            .map(|name| {
                Model::new(*name).with_property(
                    "title",
                    PropertyDef {
                        property_type: PropertyType::String,
                        required: true,
                        default: None,
                        id: false,
                    },
                )
            })
            .collect();
        ModelCompiler::compile(&models).unwrap()
    }

    #[test]
    fn two_models_yield_two_definitions_and_four_paths() {
        let doc = SwaggerEmitter::emit(&compiled(&["todo", "tag"]), &ApiMeta::for_app("todo"));
        assert_eq!(doc["definitions"].as_object().unwrap().len(), 2);
        assert_eq!(doc["paths"].as_object().unwrap().len(), 4);
        assert!(doc["paths"].get("/todos").is_some());
        assert!(doc["paths"]["/todos/{id}"].get("patch").is_some());
    }

    #[test]
    fn operation_ids_follow_the_alias_scheme() {
        let doc = SwaggerEmitter::emit(&compiled(&["todo"]), &ApiMeta::for_app("todo"));
        assert_eq!(doc["paths"]["/todos"]["post"]["operationId"], "todo.create");
        assert_eq!(doc["paths"]["/todos"]["get"]["operationId"], "todo.findAll");
        assert_eq!(
            doc["paths"]["/todos"]["delete"]["operationId"],
            "todo.deleteAll"
        );
        assert_eq!(
            doc["paths"]["/todos/{id}"]["get"]["operationId"],
            "todo.findOne"
        );
        assert_eq!(
            doc["paths"]["/todos/{id}"]["put"]["operationId"],
            "todo.replace"
        );
    }

    #[test]
    fn required_list_tracks_non_optional_properties() {
        let doc = SwaggerEmitter::emit(&compiled(&["todo"]), &ApiMeta::for_app("todo"));
        assert_eq!(doc["definitions"]["Todo"]["required"], json!(["title"]));
    }

    #[test]
    fn emission_is_deterministic() {
        let models = compiled(&["todo", "tag"]);
        let meta = ApiMeta::for_app("todo");
        let a = serde_json::to_string(&SwaggerEmitter::emit(&models, &meta)).unwrap();
        let b = serde_json::to_string(&SwaggerEmitter::emit(&models, &meta)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn gateway_layering_leaves_base_content_unchanged() {
        let base = SwaggerEmitter::emit(&compiled(&["todo"]), &ApiMeta::for_app("todo"));
        let layered = SwaggerEmitter::with_api_gateway(base.clone());
        assert_eq!(layered["paths"], base["paths"]);
        assert_eq!(layered["definitions"], base["definitions"]);
        assert!(layered.get("securityDefinitions").is_some());
        assert!(base.get("securityDefinitions").is_none());
    }
}
