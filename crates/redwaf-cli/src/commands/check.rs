//! Check command
//!
//! Usage: redwaf check [--config <PATH>]

use clap::Args;
use std::path::PathBuf;

use redwaf_config::{parse_file, settings::DEFAULT_CONFIG_PATH, Settings};
use redwaf_store::{KvStore, RedisKv};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Path to the configuration source
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute the check command: connect and ping, nothing else
pub fn execute(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = args
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = parse_file(&config_path)?;
    let settings = Settings::from_config(&config)?;

    let mut store = RedisKv::connect(&settings.connection)?;
    store.ping()?;

    println!(
        "Store reachable at {}:{} (db {})",
        settings.connection.host, settings.connection.port, settings.connection.db
    );
    Ok(())
}
