//! CLI command implementations
//!
//! Each command loads what it needs, runs one library operation and returns
//! the `data` payload of the success envelope. `run` owns the envelopes.

use std::path::Path as FsPath;

use serde_json::{json, Value as Json};
use tracing::debug;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_document, write_error, write_response};
use crate::config::SchemaConfig;
use crate::document::Value;
use crate::model::{read_definition, Model};
use crate::narrow::{narrow_by_data, narrow_by_paths};
use crate::update::decompose;

/// Main CLI entry point
///
/// Parses arguments, runs the command and writes one envelope to stdout.
/// Returns the error as well so main can exit non-zero.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let outcome = load_config(cli.config.as_deref())
        .and_then(|config| run_command(cli.command, &config, read_document));

    match outcome {
        Ok(data) => write_response(data),
        Err(err) => {
            write_error(&err)?;
            Err(err)
        }
    }
}

/// Loads the config file if given, defaults otherwise.
pub fn load_config(path: Option<&FsPath>) -> CliResult<SchemaConfig> {
    match path {
        Some(path) => Ok(SchemaConfig::load(path)?),
        None => Ok(SchemaConfig::default()),
    }
}

/// Run a command; `input` supplies the stdin document when one is needed.
pub fn run_command<F>(cmd: Command, config: &SchemaConfig, input: F) -> CliResult<Json>
where
    F: FnOnce() -> CliResult<Value>,
{
    debug!(command = ?cmd, "running command");
    match cmd {
        Command::Check { model } => check(&model, config),
        Command::Validate { model, partial } => validate(&model, partial, config, input()?),
        Command::Insert { model } => insert(&model, config, input()?),
        Command::Update { model } => update(&model, config, input()?),
        Command::Decompose => Ok(decompose_payload(&input()?)),
        Command::Hide { model, paths } => hide(&model, &paths, config, input()?),
        Command::Narrow { model, paths, data } => {
            let payload = if data { Some(input()?) } else { None };
            narrow(&model, &paths, payload.as_ref(), config)
        }
    }
}

fn load_model(path: &FsPath, config: &SchemaConfig) -> CliResult<Model> {
    read_definition(path)
        .and_then(|definition| definition.into_model(config))
        .map_err(|e| CliError::from_model(e, &config.wildcard))
}

/// Definition check only
pub fn check(model_path: &FsPath, config: &SchemaConfig) -> CliResult<Json> {
    let model = load_model(model_path, config)?;
    Ok(json!({ "model": model.name(), "valid": true }))
}

/// Full or partial document validation
pub fn validate(
    model_path: &FsPath,
    partial: bool,
    config: &SchemaConfig,
    document: Value,
) -> CliResult<Json> {
    let model = load_model(model_path, config)?;
    let result = if partial {
        model.validate_partial(&document)
    } else {
        model.validate(&document)
    };
    result.map_err(|e| CliError::from_model(e.into(), &config.wildcard))?;
    Ok(json!({ "model": model.name(), "valid": true }))
}

/// Insert preparation
pub fn insert(model_path: &FsPath, config: &SchemaConfig, document: Value) -> CliResult<Json> {
    let model = load_model(model_path, config)?;
    let prepared = model
        .prepare_insert(&document)
        .map_err(|e| CliError::from_model(e.into(), &config.wildcard))?;
    Ok(json!({ "document": prepared.to_json() }))
}

/// Update preparation against a model
pub fn update(model_path: &FsPath, config: &SchemaConfig, payload: Value) -> CliResult<Json> {
    let model = load_model(model_path, config)?;
    let result = model
        .prepare_update(&payload)
        .map_err(|e| CliError::from_model(e.into(), &config.wildcard))?;
    Ok(result.to_operators())
}

/// Schema-free decomposition
pub fn decompose_payload(payload: &Value) -> Json {
    let result = decompose(payload);
    json!({ "set": result.set.to_json(), "unset": result.unset })
}

/// Field hiding
pub fn hide(
    model_path: &FsPath,
    paths: &[String],
    config: &SchemaConfig,
    document: Value,
) -> CliResult<Json> {
    let model = load_model(model_path, config)?;
    let visible = model
        .hide_fields_with(&document, paths)
        .map_err(|e| CliError::from_model(e, &config.wildcard))?;
    Ok(visible.to_json())
}

/// Schema narrowing by paths or by payload
pub fn narrow(
    model_path: &FsPath,
    paths: &[String],
    payload: Option<&Value>,
    config: &SchemaConfig,
) -> CliResult<Json> {
    let model = load_model(model_path, config)?;
    let narrowed = match payload {
        Some(payload) => narrow_by_data(model.schema(), payload, config),
        None => {
            let parsed = paths
                .iter()
                .map(|raw| config.parse_path(raw))
                .collect::<Result<Vec<_>, _>>()?;
            narrow_by_paths(model.schema(), &parsed, config)
        }
    };
    Ok(serde_json::to_value(&narrowed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn doc(json: Json) -> Value {
        Value::from_json(&json).unwrap()
    }

    fn write_model(temp_dir: &TempDir) -> PathBuf {
        let path = temp_dir.path().join("users.json");
        let body = json!({
            "name": "users",
            "schema": {"type": "object", "fields": {
                "_id": {"type": "scalar", "kind": "string"},
                "name": {"type": "scalar", "kind": "string"},
                "password": {"type": "scalar", "kind": "string"},
                "bio": {"type": "optional", "inner": {"type": "scalar", "kind": "string"}}
            }},
            "hidden": ["password"]
        });
        fs::write(&path, body.to_string()).unwrap();
        path
    }

    fn no_input() -> CliResult<Value> {
        Err(CliError::io_error("no input expected"))
    }

    #[test]
    fn test_check_command() {
        let temp_dir = TempDir::new().unwrap();
        let model = write_model(&temp_dir);
        let data = run_command(Command::Check { model }, &SchemaConfig::default(), no_input)
            .unwrap();
        assert_eq!(data, json!({"model": "users", "valid": true}));
    }

    #[test]
    fn test_check_reports_definition_issues() {
        let temp_dir = TempDir::new().unwrap();
        let model = temp_dir.path().join("bad.json");
        fs::write(
            &model,
            json!({"name": "bad", "schema": {"type": "object", "fields": {
                "cb": {"type": "array", "element": {"type": "scalar", "kind": "future"}}
            }}})
            .to_string(),
        )
        .unwrap();

        let err = run_command(Command::Check { model }, &SchemaConfig::default(), no_input)
            .unwrap_err();
        assert_eq!(err.code_str(), "DOC_SCHEMA_DEFINITION_INVALID");
        assert_eq!(err.issues()[0]["path"], "cb.<idx>");
    }

    #[test]
    fn test_update_command() {
        let temp_dir = TempDir::new().unwrap();
        let model = write_model(&temp_dir);
        let data = run_command(Command::Update { model }, &SchemaConfig::default(), || {
            Ok(doc(json!({"name": "x", "bio": {"$missing": true}})))
        })
        .unwrap();
        assert_eq!(data, json!({"$set": {"name": "x"}, "$unset": {"bio": ""}}));
    }

    #[test]
    fn test_validate_partial_command() {
        let temp_dir = TempDir::new().unwrap();
        let model = write_model(&temp_dir);
        let config = SchemaConfig::default();

        let full = run_command(
            Command::Validate { model: model.clone(), partial: false },
            &config,
            || Ok(doc(json!({"name": "x"}))),
        );
        assert!(full.is_err());

        let partial = run_command(
            Command::Validate { model, partial: true },
            &config,
            || Ok(doc(json!({"name": "x"}))),
        );
        assert!(partial.is_ok());
    }

    #[test]
    fn test_hide_command() {
        let temp_dir = TempDir::new().unwrap();
        let model = write_model(&temp_dir);
        let data = run_command(
            Command::Hide { model, paths: vec!["bio".into()] },
            &SchemaConfig::default(),
            || Ok(doc(json!({"_id": "1", "name": "a", "password": "p", "bio": "b"}))),
        )
        .unwrap();
        assert_eq!(data, json!({"_id": "1", "name": "a"}));
    }

    #[test]
    fn test_narrow_command_by_paths() {
        let temp_dir = TempDir::new().unwrap();
        let model = write_model(&temp_dir);
        let data = run_command(
            Command::Narrow { model, paths: vec!["_id".into(), "password".into()], data: false },
            &SchemaConfig::default(),
            no_input,
        )
        .unwrap();
        let fields = data["fields"].as_object().unwrap();
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["bio", "name"]);
    }

    #[test]
    fn test_decompose_command() {
        let data = run_command(Command::Decompose, &SchemaConfig::default(), || {
            Ok(doc(json!({"a": {"$missing": true}, "b": 2})))
        })
        .unwrap();
        assert_eq!(data, json!({"set": {"b": 2}, "unset": {"a": ""}}));
    }

    #[test]
    fn test_missing_model_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = check(&temp_dir.path().join("none.json"), &SchemaConfig::default()).unwrap_err();
        assert_eq!(err.code_str(), "DOC_MALFORMED_MODEL");
    }
}
