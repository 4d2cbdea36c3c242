//! JSON I/O handling for CLI
//!
//! - Input: one JSON document on stdin (extended JSON for wrapper values)
//! - Output: one JSON envelope on stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::Value as Json;

use super::errors::{CliError, CliResult};
use crate::document::Value;

/// Read the whole of stdin as a document
pub fn read_document() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_document(&input)
}

/// Parse a document from JSON text
pub fn parse_document(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    let json: Json = serde_json::from_str(input)?;
    Ok(Value::from_json(&json)?)
}

/// Success envelope
pub fn success_envelope(data: Json) -> Json {
    serde_json::json!({
        "status": "ok",
        "data": data
    })
}

/// Error envelope; `issues` is left out when empty
pub fn error_envelope(err: &CliError) -> Json {
    let mut response = serde_json::json!({
        "status": "error",
        "code": err.code_str(),
        "message": err.message()
    });
    if !err.issues().is_empty() {
        response["issues"] = Json::Array(err.issues().to_vec());
    }
    response
}

/// Write a success response to stdout
pub fn write_response(data: Json) -> CliResult<()> {
    write_json(&success_envelope(data))
}

/// Write an error response to stdout
pub fn write_error(err: &CliError) -> CliResult<()> {
    write_json(&error_envelope(err))
}

fn write_json(value: &Json) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
