//! Boutique CLI - Catalog management and a local cart.
//!
//! # Usage
//!
//! ```bash
//! # List products in the content store
//! boutique product list
//!
//! # Create a product from a draft file
//! boutique product create --file shirt.yaml
//!
//! # Add a variant to the local cart
//! boutique cart add linen-shirt --size M --color Blue --quantity 2
//! ```
//!
//! # Commands
//!
//! - `product` - List, show, create, update and delete products
//! - `cart` - Manage the cart stored under `--profile-dir`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod file_store;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "boutique")]
#[command(author, version, about = "Boutique CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage catalog products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage the local cart
    Cart {
        /// Directory holding the cart file
        #[arg(long, global = true, default_value = ".boutique")]
        profile_dir: PathBuf,

        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List all products
    List,
    /// Show one product
    Show {
        /// Product slug
        slug: String,
    },
    /// Create a product from a YAML or JSON draft
    Create {
        /// Draft file
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Replace a product's fields from a YAML or JSON draft
    Update {
        /// Product document id
        id: String,

        /// Draft file
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete a product
    Delete {
        /// Product document id
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product variant
    Add {
        /// Product slug
        slug: String,

        /// Variant size
        #[arg(short, long)]
        size: String,

        /// Variant color
        #[arg(short, long)]
        color: String,

        /// Units to add (limited to available stock)
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity
    Update {
        /// Line SKU
        sku: String,

        /// New quantity (at least 1)
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Line SKU
        sku: String,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boutique_cli=info,boutique_storefront=info,boutique_core=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    match cli.command {
        Commands::Product { action } => match action {
            ProductAction::List => commands::product::list().await?,
            ProductAction::Show { slug } => commands::product::show(&slug).await?,
            ProductAction::Create { file } => commands::product::create(&file).await?,
            ProductAction::Update { id, file } => commands::product::update(&id, &file).await?,
            ProductAction::Delete { id } => commands::product::delete(&id).await?,
        },
        Commands::Cart {
            profile_dir,
            action,
        } => match action {
            CartAction::Show => commands::cart::show(&profile_dir)?,
            CartAction::Add {
                slug,
                size,
                color,
                quantity,
            } => commands::cart::add(&profile_dir, &slug, &size, &color, quantity).await?,
            CartAction::Update { sku, quantity } => {
                commands::cart::update(&profile_dir, &sku, quantity)?;
            }
            CartAction::Remove { sku } => commands::cart::remove(&profile_dir, &sku)?,
            CartAction::Clear => commands::cart::clear(&profile_dir)?,
        },
    }
    Ok(())
}
