//! RedWAF CLI
//!
//! Administrative seeding tool for the Redis-backed WAF

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "redwaf")]
#[command(about = "RedWAF - seed the firewall's runtime store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Seed config, rule sets, IP lists and version counters
    Seed(commands::seed::SeedArgs),
    /// Check store connectivity without writing anything
    Check(commands::check::CheckArgs),
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("redwaf=info")),
        )
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Seed(args) => commands::seed::execute(args),
        Commands::Check(args) => commands::check::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
