//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `kitgen-adapters` crate provides implementations.

use std::collections::BTreeMap;
use std::path::Path;

use crate::application::composer::TemplateId;
use crate::domain::{Model, Spec};
use crate::error::KitgenResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `kitgen_adapters::filesystem::LocalFilesystem` (production)
/// - `kitgen_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> KitgenResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> KitgenResult<()>;

    /// Read a file to a string.
    fn read_file(&self, path: &Path) -> KitgenResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for template rendering.
///
/// A pure function from template plus substitution values to text. All
/// decision logic happens in the Composition Engine before rendering; the
/// renderer performs no branching of its own.
///
/// Implemented by `kitgen_adapters::renderer::SimpleRenderer`.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: TemplateId, values: &BTreeMap<String, String>)
    -> KitgenResult<String>;
}

/// Port for the persisted model documents, one JSON file per model.
///
/// Implemented by `kitgen_adapters::model_store::JsonModelStore`.
pub trait ModelStore: Send + Sync {
    /// Load every model document under a directory.
    fn load_all(&self, dir: &Path) -> KitgenResult<Vec<Model>>;

    /// Save one model document.
    fn save(&self, dir: &Path, model: &Model) -> KitgenResult<()>;
}

/// Port for the remote SDK-generation collaborator.
///
/// Failures here never roll back already-written project files; only the
/// optional SDK follow-up step is lost.
pub trait SdkGenerator: Send + Sync {
    /// Submit a spec for SDK generation, returning an artifact id.
    fn generate(&self, spec: &Spec) -> KitgenResult<String>;

    /// Fetch a generated artifact by id.
    fn fetch(&self, artifact_id: &str) -> KitgenResult<Vec<u8>>;
}

/// Port for the target ecosystem's build tool.
///
/// A blocking subprocess call with an exit-code success/failure contract.
///
/// Implemented by `kitgen_adapters::build_tool::SwiftBuildTool`.
pub trait BuildTool: Send + Sync {
    fn build(&self, project_dir: &Path) -> KitgenResult<()>;
}

/// Merge model lists by name. Later sources win over earlier ones for the
/// same model name: explicit edits > on-disk documents > spec-embedded.
/// Order of first appearance is preserved.
pub fn merge_models(spec_embedded: &[Model], on_disk: &[Model], edits: &[Model]) -> Vec<Model> {
    let mut order: Vec<String> = Vec::new();
    let mut by_name: BTreeMap<String, Model> = BTreeMap::new();

    for source in [spec_embedded, on_disk, edits] {
        for model in source {
            if !by_name.contains_key(&model.name) {
                order.push(model.name.clone());
            }
            by_name.insert(model.name.clone(), model.clone());
        }
    }

    order
        .into_iter()
        .filter_map(|name| by_name.remove(&name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_sources_win_by_name() {
        let embedded = vec![Model::new("todo"), Model::new("tag")];
        let disk = vec![Model {
            plural: Some("todos_from_disk".into()),
            ..Model::new("todo")
        }];
        let edits = vec![Model {
            plural: Some("todos_edited".into()),
            ..Model::new("todo")
        }];

        let merged = merge_models(&embedded, &disk, &edits);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].name, "todo");
        assert_eq!(merged[0].plural.as_deref(), Some("todos_edited"));
        assert_eq!(merged[1].name, "tag");
    }

    #[test]
    fn disk_only_models_are_appended() {
        let merged = merge_models(&[Model::new("todo")], &[Model::new("note")], &[]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].name, "note");
    }
}
