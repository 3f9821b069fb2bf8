//! todo binary.

use clap::Parser;
use todo_cli::{commands::Cli, config::Config, init_tracing};
use todo_store::Storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(storage = ?config.storage, "Starting todo");

    let storage = Storage::open(&config.storage).await?;

    let mut stdout = std::io::stdout().lock();
    cli.command.run(&storage, &mut stdout).await?;

    Ok(())
}
