mod cli;
mod config;
mod input;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Aggregate(args) => cli::aggregate::run(args).await,
        Commands::Phones { phones, compact } => cli::phones::run(&phones, compact),
        Commands::Names { names, compact } => cli::names::run(&names, compact),
        Commands::Schema { schema } => cli::schema::run(schema.as_deref()),
    }
}

const fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "dossier=info,dossier_core=info",
        2 => "dossier=debug,dossier_core=debug",
        _ => "dossier=trace,dossier_core=trace",
    }
}
