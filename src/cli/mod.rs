//! CLI module for docschema
//!
//! Provides a command-line interface for:
//! - check: Check a model definition file
//! - validate: Validate a document against a model
//! - insert / update: Prepare write payloads
//! - decompose: Split an update payload into set/unset
//! - hide / narrow: Field hiding and schema narrowing

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{load_config, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_document, read_document, write_error, write_response};
