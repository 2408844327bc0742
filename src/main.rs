// AIL Config - Configuration and store bootstrap for the AIL framework
// Copyright (c) 2025 AIL Contributors
// Licensed under the GNU Affero General Public License v3.0

use ail_config::cli::{Cli, Commands};
use ail_config::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Console always; rolling JSON files only with --log-dir
    let _guard = match init_logging(&cli.log_level, &cli.logging_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "ail-config starting");

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            1
        }
    };

    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    let options = cli.load_options();
    match &cli.command {
        Some(Commands::InjectLacusUrl(args)) => args.execute().await,
        Some(Commands::CheckConnections(args)) => args.execute(&options).await,
        None => cli.actions.execute(&options).await,
    }
}
