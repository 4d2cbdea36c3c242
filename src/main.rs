//! docschema CLI entry point
//!
//! Installs logging on stderr, delegates to `cli::run` and exits non-zero
//! on failure. stdout carries only the JSON envelope.

use docschema::cli;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
