//! Seed command
//!
//! Usage: redwaf seed [--config <PATH>]

use clap::Args;
use std::path::PathBuf;

use redwaf_config::{parse_file, settings::DEFAULT_CONFIG_PATH, Settings};
use redwaf_store::{RedisKv, Seeder};

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Path to the configuration source
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute the seed command
///
/// Connectivity is checked before any mutation; a failed check aborts the
/// run with the store untouched.
pub fn execute(args: SeedArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = args
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = parse_file(&config_path)?;
    let settings = Settings::from_config(&config)?;

    println!(
        "Seeding store at {}:{} (db {})...",
        settings.connection.host, settings.connection.port, settings.connection.db
    );

    let mut store = RedisKv::connect(&settings.connection)?;
    Seeder::new(&mut store, &settings).seed_all(|line| println!("{}", line))?;

    println!("\nStore seeding complete.");
    Ok(())
}
