//! JSON model store: one document per model under a models directory.

use std::path::{Path, PathBuf};

use kitgen_core::{
    application::{ApplicationError, ports::ModelStore},
    domain::Model,
    error::KitgenResult,
};
use tracing::debug;

/// Persists models as individual JSON documents named `{model}.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModelStore;

impl JsonModelStore {
    pub fn new() -> Self {
        Self
    }

    fn document_path(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.json"))
    }
}

impl ModelStore for JsonModelStore {
    fn load_all(&self, dir: &Path) -> KitgenResult<Vec<Model>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ApplicationError::ModelStore {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut models = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| ApplicationError::ModelStore {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                })?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let raw = std::fs::read_to_string(&path).map_err(|e| ApplicationError::ModelStore {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            let model: Model =
                serde_json::from_str(&raw).map_err(|e| ApplicationError::ModelStore {
                    path: path.clone(),
                    reason: format!("not a valid model document: {e}"),
                })?;
            debug!(model = %model.name, path = %path.display(), "loaded model document");
            models.push(model);
        }

        // Directory iteration order is platform-dependent.
        models.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(models)
    }

    fn save(&self, dir: &Path, model: &Model) -> KitgenResult<()> {
        std::fs::create_dir_all(dir).map_err(|e| ApplicationError::ModelStore {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let path = Self::document_path(dir, &model.name);
        let raw = serde_json::to_string_pretty(model).map_err(|e| ApplicationError::ModelStore {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| {
            ApplicationError::ModelStore {
                path,
                reason: e.to_string(),
            }
            .into()
        })
    }
}
