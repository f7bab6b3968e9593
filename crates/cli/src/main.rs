//! Print Router CLI - migrations and operator jobs.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! pr-cli migrate
//!
//! # Assign every unassigned paid order
//! pr-cli assign
//!
//! # Move every assignment to print center 3
//! pr-cli reassign-all --center 3
//!
//! # Give orders without a location the fallback coordinates
//! pr-cli normalize-coordinates
//!
//! # List centers that receive new work
//! pr-cli centers
//!
//! # Show what the public tracking page shows for order 42
//! pr-cli track --order 42
//! ```
//!
//! All commands read `ROUTER_DATABASE_URL` (or `DATABASE_URL`) and print
//! their report as JSON on stdout.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pr-cli")]
#[command(author, version, about = "Print router operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Assign unassigned paid orders to the first active print center
    Assign,
    /// Point every assignment at one print center (statuses unchanged)
    ReassignAll {
        /// Target print center ID
        #[arg(short, long)]
        center: i32,
    },
    /// Fill in missing order coordinates with the fallback point
    NormalizeCoordinates,
    /// List active print centers in selection order
    Centers,
    /// Show the public tracking view of an order
    Track {
        /// Order ID
        #[arg(short, long)]
        order: i32,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "print_router_server=info,pr_cli=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Assign => commands::jobs::assign().await,
        Commands::ReassignAll { center } => commands::jobs::reassign_all(center.into()).await,
        Commands::NormalizeCoordinates => commands::jobs::normalize_coordinates().await,
        Commands::Centers => commands::inspect::centers().await,
        Commands::Track { order } => commands::inspect::track(order.into()).await,
    }
}
