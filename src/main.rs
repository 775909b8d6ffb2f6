//! chaos-brain entry point.

use clap::Parser;

use chaos_brain::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command() {
        Commands::Run => commands::run::execute(&cli).await,
        Commands::Config => commands::config::execute(&cli),
    };

    if let Err(err) = result {
        chaos_brain::cli::handle_error(err, cli.json);
    }
}
