//! Model registry
//!
//! Holds every defined model by name. Model definitions can be registered
//! directly or loaded from a directory of JSON files, one model per file:
//!
//! ```json
//! {"name": "users", "schema": {"type": "object", "fields": {...}}, "hidden": ["password"]}
//! ```
//!
//! Any unreadable, malformed or invalid file fails the whole load.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path as FsPath, PathBuf};

use tracing::{debug, info};

use super::errors::{ModelError, ModelResult};
use super::model::{Model, ModelDefinition};
use crate::config::SchemaConfig;

/// Registry of defined models, keyed by name.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    config: SchemaConfig,
    models: BTreeMap<String, Model>,
}

impl ModelRegistry {
    /// Creates an empty registry. Loaded definitions use `config`.
    pub fn new(config: SchemaConfig) -> Self {
        Self {
            config,
            models: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Loads every `*.json` file in `dir`, in file name order.
    ///
    /// Returns the number of models loaded.
    pub fn load_dir(&mut self, dir: &FsPath) -> ModelResult<usize> {
        let entries = fs::read_dir(dir).map_err(|e| {
            ModelError::malformed(
                dir.display().to_string(),
                format!("Failed to read model directory: {}", e),
            )
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                ModelError::malformed(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }

        info!(dir = %dir.display(), models = paths.len(), "model definitions loaded");
        Ok(paths.len())
    }

    /// Loads and registers a single model definition file.
    pub fn load_file(&mut self, path: &FsPath) -> ModelResult<&Model> {
        let definition = read_definition(path)?;
        let model = definition.into_model(&self.config)?;
        debug!(model = model.name(), file = %path.display(), "model definition read");
        self.register(model)
    }

    /// Registers an already defined model. Names are unique.
    pub fn register(&mut self, model: Model) -> ModelResult<&Model> {
        let name = model.name().to_string();
        if self.models.contains_key(&name) {
            return Err(ModelError::Duplicate(name));
        }
        Ok(self.models.entry(name).or_insert(model))
    }

    /// Gets a model by name.
    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// Gets a model by name or fails with `DOC_UNKNOWN_MODEL`.
    pub fn require(&self, name: &str) -> ModelResult<&Model> {
        self.get(name)
            .ok_or_else(|| ModelError::Unknown(name.to_string()))
    }

    /// Registered model names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Reads a model definition file without checking the schema.
pub fn read_definition(path: &FsPath) -> ModelResult<ModelDefinition> {
    let content = fs::read_to_string(path).map_err(|e| {
        ModelError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        ModelError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaNode;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_model(dir: &FsPath, file: &str, body: serde_json::Value) {
        fs::write(dir.join(file), serde_json::to_string_pretty(&body).unwrap()).unwrap();
    }

    fn users_json() -> serde_json::Value {
        json!({
            "name": "users",
            "schema": {"type": "object", "fields": {
                "_id": {"type": "scalar", "kind": "string"},
                "name": {"type": "scalar", "kind": "string"}
            }},
            "hidden": []
        })
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ModelRegistry::new(SchemaConfig::default());
        let model = Model::define(
            "users",
            SchemaNode::object([("_id", SchemaNode::string())]),
            vec![],
            SchemaConfig::default(),
        )
        .unwrap();

        registry.register(model).unwrap();
        assert_eq!(registry.get("users").unwrap().name(), "users");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = ModelRegistry::new(SchemaConfig::default());
        let model = Model::define(
            "users",
            SchemaNode::object([("_id", SchemaNode::string())]),
            vec![],
            SchemaConfig::default(),
        )
        .unwrap();

        registry.register(model.clone()).unwrap();
        let err = registry.register(model).unwrap_err();
        assert_eq!(err.code(), "DOC_DUPLICATE_MODEL");
    }

    #[test]
    fn test_load_dir_skips_other_files() {
        let temp_dir = TempDir::new().unwrap();
        write_model(temp_dir.path(), "users.json", users_json());
        fs::write(temp_dir.path().join("README.txt"), "not a model").unwrap();

        let mut registry = ModelRegistry::new(SchemaConfig::default());
        assert_eq!(registry.load_dir(temp_dir.path()).unwrap(), 1);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["users"]);
    }

    #[test]
    fn test_load_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = ModelRegistry::new(SchemaConfig::default());
        assert_eq!(registry.load_dir(temp_dir.path()).unwrap(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_malformed_file_fails_load() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken.json"), "{ nope").unwrap();

        let mut registry = ModelRegistry::new(SchemaConfig::default());
        let err = registry.load_dir(temp_dir.path()).unwrap_err();
        assert_eq!(err.code(), "DOC_MALFORMED_MODEL");
    }

    #[test]
    fn test_invalid_definition_fails_load() {
        let temp_dir = TempDir::new().unwrap();
        write_model(
            temp_dir.path(),
            "jobs.json",
            json!({
                "name": "jobs",
                "schema": {"type": "object", "fields": {
                    "_id": {"type": "optional", "inner": {"type": "scalar", "kind": "string"}},
                    "run": {"type": "scalar", "kind": "function"}
                }}
            }),
        );

        let mut registry = ModelRegistry::new(SchemaConfig::default());
        match registry.load_dir(temp_dir.path()).unwrap_err() {
            ModelError::Definition(err) => assert_eq!(err.issues().len(), 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = ModelRegistry::new(SchemaConfig::default());
        assert!(registry.load_dir(&temp_dir.path().join("absent")).is_err());
    }

    #[test]
    fn test_unknown_model() {
        let registry = ModelRegistry::new(SchemaConfig::default());
        assert_eq!(registry.require("nope").unwrap_err().code(), "DOC_UNKNOWN_MODEL");
    }
}
