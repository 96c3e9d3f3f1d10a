//! Shopfront CLI - inspect and edit cart, wishlist and CMS state.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart stored in the data directory
//! sf-cli cart list
//!
//! # Add a catalog product (and one of its variants) to the cart
//! sf-cli --catalog catalog.yaml cart add 7b1f3c52-0d7e-4a43-9b8e-2f6a4c1d9e10 --variant 500g
//!
//! # Change a line quantity; below the MOQ removes the line
//! sf-cli cart set-quantity 7b1f3c52-0d7e-4a43-9b8e-2f6a4c1d9e10 4
//!
//! # Resolve a CMS setting, falling back to its default
//! sf-cli cms setting currency_symbol
//! ```
//!
//! # Commands
//!
//! - `cart` - `list`, `add`, `remove`, `set-quantity`, `clear`
//! - `wishlist` - `list`, `add`, `remove`, `contains`, `clear`
//! - `cms` - `setting`, `banners`, `content`
//!
//! Results are printed to stdout as JSON. Logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shopfront_core::ProductId;
use shopfront_storefront::Storefront;
use shopfront_storefront::catalog::Catalog;
use shopfront_storefront::config::ShopfrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(author, version, about = "Shopfront cart, wishlist and CMS tools")]
struct Cli {
    /// Directory holding the cart and wishlist slots (overrides `SHOPFRONT_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Product catalog YAML (overrides `SHOPFRONT_CATALOG_FILE`)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Inspect or edit the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Query CMS settings, content and banners
    Cms {
        #[command(subcommand)]
        action: CmsAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show lines, item count and subtotal
    List,
    /// Add a catalog product
    Add {
        /// Product id
        product: ProductId,

        /// Variant name
        #[arg(short, long)]
        variant: Option<String>,

        /// Units to add (defaults to the product MOQ)
        #[arg(short, long)]
        quantity: Option<u32>,
    },
    /// Remove a line
    Remove {
        /// Product id
        product: ProductId,

        /// Variant name
        #[arg(short, long)]
        variant: Option<String>,
    },
    /// Set the quantity of a line
    SetQuantity {
        /// Product id
        product: ProductId,

        /// New quantity; below the line MOQ removes it
        #[arg(allow_negative_numbers = true)]
        quantity: i64,

        /// Variant name
        #[arg(short, long)]
        variant: Option<String>,
    },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved items
    List,
    /// Save a catalog product
    Add {
        /// Product id
        product: ProductId,
    },
    /// Remove a saved item
    Remove {
        /// Item id
        id: String,
    },
    /// Check whether an item is saved
    Contains {
        /// Item id
        id: String,
    },
    /// Remove every saved item
    Clear,
}

#[derive(Subcommand)]
enum CmsAction {
    /// Resolve a site setting
    Setting {
        /// Setting key, e.g. `site_name`
        key: String,
    },
    /// List banners that are live now
    Banners {
        /// Only banners at this position
        #[arg(short, long)]
        position: Option<String>,
    },
    /// Show an active content block
    Content {
        /// Page section, e.g. `hero`
        section: String,
        /// Block key within the section
        key: String,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays machine-readable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_cli=info,shopfront_storefront=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ShopfrontConfig::from_env()?;
    let data_dir = cli.data_dir.unwrap_or(config.data_dir);
    let catalog_file = cli.catalog.or(config.catalog_file);

    let output = match cli.command {
        Commands::Cart { action } => {
            let mut session = Storefront::open_dir(&data_dir)?;
            let cart = session.cart_mut();
            match action {
                CartAction::List => commands::cart::list(cart)?,
                CartAction::Add {
                    product,
                    variant,
                    quantity,
                } => {
                    let catalog = load_catalog(catalog_file).await?;
                    commands::cart::add(cart, &catalog, product, variant.as_deref(), quantity)?
                }
                CartAction::Remove { product, variant } => {
                    commands::cart::remove(cart, product, variant.as_deref())?
                }
                CartAction::SetQuantity {
                    product,
                    quantity,
                    variant,
                } => commands::cart::set_quantity(cart, product, variant.as_deref(), quantity)?,
                CartAction::Clear => commands::cart::clear(cart)?,
            }
        }
        Commands::Wishlist { action } => {
            let mut session = Storefront::open_dir(&data_dir)?;
            let wishlist = session.wishlist_mut();
            match action {
                WishlistAction::List => commands::wishlist::list(wishlist)?,
                WishlistAction::Add { product } => {
                    let catalog = load_catalog(catalog_file).await?;
                    commands::wishlist::add(wishlist, &catalog, product)?
                }
                WishlistAction::Remove { id } => commands::wishlist::remove(wishlist, &id)?,
                WishlistAction::Contains { id } => commands::wishlist::contains(wishlist, &id)?,
                WishlistAction::Clear => commands::wishlist::clear(wishlist)?,
            }
        }
        Commands::Cms { action } => {
            let cms = commands::cms::resolver(&config.cms).await?;
            match action {
                CmsAction::Setting { key } => commands::cms::setting(&cms, &key)?,
                CmsAction::Banners { position } => {
                    commands::cms::banners(&cms, position.as_deref(), chrono::Utc::now())?
                }
                CmsAction::Content { section, key } => {
                    commands::cms::content(&cms, &section, &key)?
                }
            }
        }
    };

    commands::print_json(&output)?;
    Ok(())
}

async fn load_catalog(path: Option<PathBuf>) -> Result<Catalog, Box<dyn std::error::Error>> {
    let path = path.ok_or("no catalog configured: pass --catalog or set SHOPFRONT_CATALOG_FILE")?;
    tracing::debug!(path = %path.display(), "Loading catalog");
    Ok(Catalog::load(&path).await?)
}
