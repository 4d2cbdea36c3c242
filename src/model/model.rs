//! Document model
//!
//! Binds a name, a checked schema and a list of hidden paths. Prepares the
//! payloads a store write needs; the write itself belongs to the caller.
//!
//! Write flow:
//! - insert: clone, fill defaults, validate (the identifier may be left out
//!   for the store to assign)
//! - update: reject the identifier, decompose into set/unset, narrow the
//!   schema to the set tree, validate, and refuse to unset required fields
//! - read: hide the declared paths on a clone of the fetched document

use serde::Deserialize;
use tracing::debug;

use super::errors::{ModelError, ModelResult};
use crate::config::{SchemaConfig, UnknownKeys};
use crate::document::Value;
use crate::narrow::{narrow_by_data, narrow_by_paths};
use crate::path::Path;
use crate::schema::{
    apply_defaults, validate_definition, validate_document, DefinitionResult, SchemaNode,
    ValidationError, ValidationIssue, ValidationResult,
};
use crate::tree::delete_paths;
use crate::update::{decompose, UpdateResult};

/// On-disk model definition
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDefinition {
    pub name: String,
    pub schema: SchemaNode,
    /// Dot paths removed from fetched documents
    #[serde(default)]
    pub hidden: Vec<String>,
}

impl ModelDefinition {
    /// Parses the hidden paths and checks the schema.
    pub fn into_model(self, config: &SchemaConfig) -> ModelResult<Model> {
        let hidden = self
            .hidden
            .iter()
            .map(|raw| config.parse_path(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Model::define(self.name, self.schema, hidden, config.clone())?)
    }
}

/// A named schema whose definition has been checked.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    schema: SchemaNode,
    hidden: Vec<Path>,
    config: SchemaConfig,
}

impl Model {
    /// Checks the schema definition and builds the model.
    pub fn define(
        name: impl Into<String>,
        schema: SchemaNode,
        hidden: Vec<Path>,
        config: SchemaConfig,
    ) -> DefinitionResult<Self> {
        let name = name.into();
        validate_definition(&schema, &name, &config)?;
        Ok(Self {
            name,
            schema,
            hidden,
            config,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    pub fn hidden(&self) -> &[Path] {
        &self.hidden
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Validates a complete document against the full schema.
    pub fn validate(&self, document: &Value) -> ValidationResult<()> {
        self.reject_if_any(validate_document(&self.schema, document, &self.config))
    }

    /// Validates a partial payload against the schema narrowed to it.
    /// Unknown keys are always rejected here.
    pub fn validate_partial(&self, payload: &Value) -> ValidationResult<()> {
        self.reject_if_any(self.partial_issues(payload))
    }

    /// Returns the document to insert: a clone with defaults applied.
    ///
    /// Removal sentinels are dropped first. An inserted field holding one is
    /// treated as absent, so defaults fill it and required fields report it.
    pub fn prepare_insert(&self, document: &Value) -> ValidationResult<Value> {
        if document.as_object().is_none() {
            return Err(self.root_not_object(document));
        }

        let mut prepared = document.clone();
        prepared.remove_missing();
        apply_defaults(&self.schema, &mut prepared);

        let has_id = prepared.get(&self.config.id_field).is_some();
        let issues = if has_id {
            validate_document(&self.schema, &prepared, &self.config)
        } else {
            let without_id = narrow_by_paths(&self.schema, &[self.config.id_path()], &self.config);
            validate_document(&without_id, &prepared, &self.config)
        };

        self.reject_if_any(issues)?;
        Ok(prepared)
    }

    /// Builds the set/unset operators for an update payload.
    pub fn prepare_update(&self, update: &Value) -> ValidationResult<UpdateResult> {
        let Some(fields) = update.as_object() else {
            return Err(self.root_not_object(update));
        };

        let mut issues = Vec::new();
        if fields.contains_key(&self.config.id_field) {
            issues.push(ValidationIssue::new(
                self.config.id_path(),
                "identifier field cannot be updated",
            ));
        }

        let result = decompose(update);
        issues.extend(self.partial_issues(&result.set));

        for raw in result.unset.keys() {
            let path = match Path::parse(raw, &self.config.wildcard) {
                Ok(path) => path,
                Err(e) => {
                    issues.push(ValidationIssue::new(Path::root(), e.to_string()));
                    continue;
                }
            };
            if path == self.config.id_path() {
                continue;
            }
            match self.schema.resolve(&path) {
                None => issues.push(ValidationIssue::unknown_field(path)),
                Some(node) if !node.is_omittable() => {
                    issues.push(ValidationIssue::new(path, "required field cannot be unset"))
                }
                Some(_) => {}
            }
        }

        self.reject_if_any(issues)?;
        debug!(
            model = %self.name,
            unset = result.unset.len(),
            "update prepared"
        );
        Ok(result)
    }

    /// Returns a clone of `document` with every hidden path removed.
    pub fn hide_fields(&self, document: &Value) -> Value {
        let mut visible = document.clone();
        delete_paths(&mut visible, &self.hidden, &self.config);
        visible
    }

    /// Like [`hide_fields`](Self::hide_fields) with extra paths parsed from
    /// strings.
    pub fn hide_fields_with(&self, document: &Value, extra: &[String]) -> ModelResult<Value> {
        let extra = extra
            .iter()
            .map(|raw| self.config.parse_path(raw))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ModelError::from)?;

        let mut visible = self.hide_fields(document);
        delete_paths(&mut visible, &extra, &self.config);
        Ok(visible)
    }

    fn partial_issues(&self, payload: &Value) -> Vec<ValidationIssue> {
        let strict = self.config.with_unknown_keys(UnknownKeys::Reject);
        let narrowed = narrow_by_data(&self.schema, payload, &strict);
        validate_document(&narrowed, payload, &strict)
    }

    fn root_not_object(&self, document: &Value) -> ValidationError {
        ValidationError::new(
            self.name.clone(),
            vec![ValidationIssue::type_mismatch(
                Path::root(),
                "object",
                document.kind_name(),
            )],
        )
    }

    fn reject_if_any(&self, issues: Vec<ValidationIssue>) -> ValidationResult<()> {
        if issues.is_empty() {
            Ok(())
        } else {
            debug!(model = %self.name, issues = issues.len(), "document rejected");
            Err(ValidationError::new(self.name.clone(), issues))
        }
    }
}
