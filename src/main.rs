//! Imageref CLI entry point
//!
//! Resolves container image references and matches them against a local
//! image index.

use clap::Parser;
use imageref::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = cli.paths()?;

    match cli.command {
        Commands::Parse(args) => imageref::cli::parse::execute(args),
        Commands::Match(args) => imageref::cli::matches::execute(args),
        Commands::Tag(args) => imageref::cli::tag::execute(args, &paths),
        Commands::Untag(args) => imageref::cli::tag::execute_untag(args, &paths),
        Commands::Images(args) => imageref::cli::images::execute(args, &paths),
        Commands::Find(args) => imageref::cli::find::execute(args, &paths),
        Commands::Rmi(args) => imageref::cli::rm::execute(args, &paths),
    }
}
