//! Tiffin CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run site database migrations (includes the session store)
//! tiffin-cli migrate
//!
//! # Promote a registered user to admin
//! tiffin-cli admin grant -e admin@example.com
//!
//! # Seed menu items from a YAML file
//! tiffin-cli seed menu --file seeds/menu.yaml
//!
//! # Replace the whole menu
//! tiffin-cli seed menu --file seeds/menu.yaml --clear
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin grant` - Promote a registered user to admin
//! - `seed menu` - Load menu items from YAML

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tiffin-cli")]
#[command(author, version, about = "Tiffin CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin access
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Promote an existing user to admin
    Grant {
        /// Email of the user to promote
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Seed menu items from a YAML file
    Menu {
        /// Path to the YAML file
        #[arg(short, long, default_value = "seeds/menu.yaml")]
        file: String,

        /// Delete existing menu items first
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Grant { email } => commands::admin::grant(&email).await?,
        },
        Commands::Seed { target } => match target {
            SeedTarget::Menu { file, clear } => commands::seed::menu(&file, clear).await?,
        },
    }
    Ok(())
}
