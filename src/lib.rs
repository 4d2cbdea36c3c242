//! docschema - path-addressed schema and document transformations
//!
//! Binds tree-shaped schemas to JSON-like documents:
//! - [`path`]: dot paths with a configurable array wildcard
//! - [`schema`]: type taxonomy, definition checks and document validation
//! - [`tree`]: field deletion over documents and schemas
//! - [`narrow`]: partial schemas derived from paths or payloads
//! - [`update`]: set/unset decomposition of update payloads
//! - [`model`]: named models and the registry that loads them

pub mod cli;
pub mod config;
pub mod document;
pub mod model;
pub mod narrow;
pub mod path;
pub mod schema;
pub mod tree;
pub mod update;

pub use config::SchemaConfig;
pub use document::Value;
pub use path::{Path, Segment};
