//! Counsel CLI entry point.

use clap::Parser;

use counsel::cli::{commands, handle_error, Cli, Commands};
use counsel::infrastructure::{logging, ConfigLoader};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {err:#}");
            std::process::exit(2);
        }
    };

    if let Err(err) = logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {err:#}");
        std::process::exit(2);
    }

    let result = match cli.command {
        Commands::Ask(args) => commands::ask::execute(config, args, cli.json).await,
        Commands::Route(args) => commands::route::execute(&config, &args, cli.json),
        Commands::Ingest(args) => commands::ingest::execute(config, args, cli.json).await,
        Commands::Doctor => commands::doctor::execute(config, cli.json).await,
        Commands::Config(args) => commands::config::execute(&config, &args, cli.json),
    };

    if let Err(err) = result {
        handle_error(&err, cli.json);
    }
}
