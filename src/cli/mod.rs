//! Command-line interface.
//!
//! Thin layer over the assembled runtime: clap definitions, command
//! handlers, and terminal output helpers. Command results go to stdout;
//! logs and progress go to stderr.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

/// Print a command failure and exit non-zero.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        eprintln!("{}", serde_json::json!({ "error": format!("{err:#}") }));
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
