//! Chisel - headless rock carving host

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;

use cli::{Cli, Command};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chisel=info,carving=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Carve(args) => {
            for path in commands::carve(args)? {
                println!("{}", path.display());
            }
        }
        Command::Info(args) => println!("{}", commands::info(args)?),
    }
    Ok(())
}
