//! Main entry point for the kidset CLI

use clap::Parser;
use kidset::cli::{self, Cli};
use kidset_common::{KidsetConfig, LoggingTransformer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = KidsetConfig::load(cli.config.as_deref())?
        .with_overrides(cli.store_dir.clone(), cli.log_level.clone());

    LoggingTransformer::init_with_filter(config.log_level.as_deref());
    log::debug!("Using key store at {}", config.store_dir.display());

    let output = cli::execute(&cli.command, &config)?;
    println!("{output}");
    Ok(())
}
