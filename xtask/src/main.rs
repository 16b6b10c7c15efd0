//! xtask - Development task runner for rbtree
//!
//! Usage:
//!   cargo xtask stress [--scenario <yaml>] [options]

mod stress;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development task runner for rbtree")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a randomized workload against the tree and a reference model
    Stress(stress::StressArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stress(args) => stress::run(args),
    }
}
