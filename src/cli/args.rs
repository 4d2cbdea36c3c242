//! CLI argument definitions using clap
//!
//! Commands:
//! - docschema check <model>
//! - docschema validate <model> [--partial]
//! - docschema insert <model>
//! - docschema update <model>
//! - docschema decompose
//! - docschema hide <model> [--path <p>]...
//! - docschema narrow <model> [--path <p>]... [--data]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docschema - schema binding, narrowing and update decomposition for documents
#[derive(Parser, Debug)]
#[command(name = "docschema")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a model definition file
    Check {
        /// Model definition file
        model: PathBuf,
    },

    /// Validate a document read from stdin
    Validate {
        /// Model definition file
        model: PathBuf,
        /// Validate against the schema narrowed to the document's keys
        #[arg(long)]
        partial: bool,
    },

    /// Prepare an insert payload read from stdin (defaults applied)
    Insert {
        /// Model definition file
        model: PathBuf,
    },

    /// Prepare update operators for a payload read from stdin
    Update {
        /// Model definition file
        model: PathBuf,
    },

    /// Split an update payload from stdin into set/unset without a schema
    Decompose,

    /// Remove the model's hidden paths from a document read from stdin
    Hide {
        /// Model definition file
        model: PathBuf,
        /// Additional paths to hide
        #[arg(long = "path")]
        paths: Vec<String>,
    },

    /// Print the model schema narrowed by paths or by a stdin payload
    Narrow {
        /// Model definition file
        model: PathBuf,
        /// Paths to remove from the schema
        #[arg(long = "path")]
        paths: Vec<String>,
        /// Narrow to the keys of a payload read from stdin instead
        #[arg(long, conflicts_with = "paths")]
        data: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
