use anyhow::Result;
use clap::Parser;

mod cli;
mod config;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    model::init_tracing("info");

    let cli = Cli::parse();
    cli.run().await?;

    Ok(())
}
