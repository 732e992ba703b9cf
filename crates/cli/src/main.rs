//! Commerce CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (config file, falling back to DB_* variables)
//! commerce-cli migrate --config dbconfig.json
//!
//! # Register a user
//! commerce-cli user create -f Ada -l Lovelace -e ada@example.com -p 'correct horse'
//!
//! # Print a category subtree
//! commerce-cli category tree 1 --depth 3
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the schema and run database migrations
//! - `user create` - Register a user (password is hashed before storage)
//! - `category tree` - Print a category and its descendants
//!
//! Set `RUST_LOG` to adjust log levels and `COMMERCE_LOG_FORMAT=json` for
//! JSON log lines.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "commerce-cli")]
#[command(author, version, about = "Commerce store CLI tools")]
struct Cli {
    /// JSON database config file; `DB_*` environment variables are used if
    /// it is missing or unreadable
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema and run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Inspect categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a new user
    Create {
        /// Given name
        #[arg(short, long)]
        first_name: String,

        /// Family name
        #[arg(short, long)]
        last_name: String,

        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Plaintext password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Print a category and its descendants
    Tree {
        /// Root category ID
        id: i32,

        /// Levels to descend (capped at 16)
        #[arg(short, long, default_value_t = 3)]
        depth: usize,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "commerce_store=info,commerce_cli=info".into());

    let json = std::env::var("COMMERCE_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Migrate => commands::migrate::run(config).await?,
        Commands::User { action } => match action {
            UserAction::Create {
                first_name,
                last_name,
                email,
                password,
            } => {
                commands::user::create(config, &first_name, &last_name, &email, &password).await?;
            }
        },
        Commands::Category { action } => match action {
            CategoryAction::Tree { id, depth } => {
                commands::category::tree(config, id, depth).await?;
            }
        },
    }
    Ok(())
}
