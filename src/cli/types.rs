//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::commands::ask::AskArgs;
use crate::cli::commands::config::ConfigArgs;
use crate::cli::commands::ingest::IngestArgs;
use crate::cli::commands::route::RouteArgs;

#[derive(Parser)]
#[command(name = "counsel")]
#[command(about = "Counsel - domain-routed startup advisory runtime", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .counsel/
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a question; the router picks the right domain agent
    Ask(AskArgs),

    /// Classify a message without dispatching it
    Route(RouteArgs),

    /// Chunk, embed, and index a document into a collection
    Ingest(IngestArgs),

    /// Probe the store, embedder, tools, and providers
    Doctor,

    /// Configuration commands
    Config(ConfigArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_parses_domain_override() {
        let cli = Cli::parse_from([
            "counsel",
            "ask",
            "is this patentable?",
            "--domain",
            "patent",
            "--json",
        ]);
        assert!(cli.json);
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.query, "is this patentable?");
                assert_eq!(args.domain.as_deref(), Some("patent"));
            }
            _ => panic!("expected ask subcommand"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["counsel", "--config", "/tmp/alt.yaml", "doctor"]);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/alt.yaml")));
        assert!(matches!(cli.command, Commands::Doctor));
    }
}
