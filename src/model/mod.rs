//! Document models
//!
//! The in-process half of a document model: definition checks, write payload
//! preparation and field hiding. Store I/O is the caller's concern.

mod errors;
mod model;
mod registry;

pub use errors::{ModelError, ModelResult};
pub use model::{Model, ModelDefinition};
pub use registry::{read_definition, ModelRegistry};
