use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nvim_agent::app;
use nvim_agent::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    app::run(cli).await
}
