//! Stockroom CLI - edit inventory items from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (stores the bearer token in the session file)
//! stockroom session login --token <TOKEN>
//!
//! # Show an item, including its derived sale price
//! stockroom item show 42
//!
//! # Edit an item
//! stockroom item edit 42 --quantity 12 --color "crimson" --discount 15
//!
//! # Search the color catalog
//! stockroom colors red
//!
//! # Compute a sale price locally
//! stockroom sale-price 1000 10
//!
//! # Sign out
//! stockroom session logout
//! ```
//!
//! # Commands
//!
//! - `session` - Acquire or invalidate the operator session
//! - `item show` / `item edit` - The item edit workflow
//! - `colors` - Fuzzy search over the color catalog
//! - `sale-price` - Sale price derivation

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::CliError;
use commands::item::ItemEdits;

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(author, version, about = "Stockroom inventory tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the operator session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Show or edit an inventory item
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },
    /// Search the color catalog by name or code
    Colors {
        /// Search text (lists every color when omitted)
        query: Option<String>,
    },
    /// Compute the sale price for a retail price and discount percentage
    SalePrice {
        /// Retail price
        #[arg(allow_hyphen_values = true)]
        retail: String,
        /// Discount percentage (0-100)
        #[arg(allow_hyphen_values = true)]
        discount: String,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Store a bearer token for later commands
    Login {
        /// Bearer token issued by the backend
        #[arg(short, long)]
        token: String,
    },
    /// Remove the stored session
    Logout,
}

#[derive(Subcommand)]
enum ItemAction {
    /// Load an item and print its form
    Show {
        /// Item identifier
        id: String,
    },
    /// Apply edits to an item, validate, and save
    Edit {
        /// Item identifier
        id: String,

        #[command(flatten)]
        edits: ItemEdits,
    },
}

/// Install the tracing subscriber.
///
/// Text output by default; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stockroom_client=info,stockroom_cli=info".into());

    let is_json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        output::failure(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Session { action } => match action {
            SessionAction::Login { token } => commands::session::login(&token)?,
            SessionAction::Logout => commands::session::logout()?,
        },
        Commands::Item { action } => match action {
            ItemAction::Show { id } => commands::item::show(&id).await?,
            ItemAction::Edit { id, edits } => commands::item::edit(&id, &edits).await?,
        },
        Commands::Colors { query } => {
            commands::colors::search(query.as_deref().unwrap_or_default()).await?;
        }
        Commands::SalePrice { retail, discount } => {
            commands::sale_price(&retail, &discount)?;
        }
    }
    Ok(())
}
