//! Cartwheel CLI - database migrations and demo data.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! cw-cli migrate
//!
//! # Insert demo products and a customer (with cart)
//! cw-cli seed
//! cw-cli seed --customer "Grace Hopper"
//! ```
//!
//! Both commands read `CARTWHEEL_DATABASE_URL` (or `DATABASE_URL`), loading
//! `.env` first if present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cw-cli")]
#[command(author, version, about = "Cartwheel CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo products and a customer
    Seed {
        /// Name of the demo customer
        #[arg(short, long, default_value = "Demo Customer")]
        customer: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed { customer } => commands::seed::run(&customer).await,
    }
}
