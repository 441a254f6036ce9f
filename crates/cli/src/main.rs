//! Go Marketplace CLI - Inspect and edit the device-local cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cli cart list
//!
//! # Add one unit of a product
//! gm-cli cart add --id 42 --title "Linen Shirt" --image-url https://cdn/shirt.png --price 45.00
//!
//! # Change a line item's quantity
//! gm-cli cart increment 42
//! gm-cli cart decrement 42
//! ```
//!
//! # Commands
//!
//! - `cart list` - Show every line item and the unit count
//! - `cart add` - Add a product (creates the line item or bumps it)
//! - `cart increment` / `cart decrement` - Adjust an existing line item
//!
//! Configuration is read from the environment; see
//! `go_marketplace_storefront::config` for the variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use go_marketplace_core::Price;
use go_marketplace_storefront::CartConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "gm-cli")]
#[command(author, version, about = "Go Marketplace CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    List,
    /// Add one unit of a product
    Add {
        /// Product ID
        #[arg(short, long)]
        id: String,

        /// Product display name
        #[arg(short, long)]
        title: String,

        /// Product image URL
        #[arg(long, default_value = "")]
        image_url: String,

        /// Unit price (e.g. 19.99)
        #[arg(short, long)]
        price: Price,
    },
    /// Add one unit to an existing line item
    Increment {
        /// Product ID
        id: String,
    },
    /// Remove one unit from a line item (removes it at zero)
    Decrement {
        /// Product ID
        id: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration is needed before tracing for the Sentry DSN
    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gm_cli=info,go_marketplace_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(config).await,
            CartAction::Add {
                id,
                title,
                image_url,
                price,
            } => commands::cart::add(config, &id, &title, &image_url, price).await?,
            CartAction::Increment { id } => commands::cart::increment(config, &id).await?,
            CartAction::Decrement { id } => commands::cart::decrement(config, &id).await?,
        },
    }
    Ok(())
}
