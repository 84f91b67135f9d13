//! Catalog Picker CLI - browse the catalog and assemble product lists.
//!
//! # Usage
//!
//! ```bash
//! # Page through the whole catalog, three pages at most
//! picker-cli search --pages 3
//!
//! # Search for a product
//! picker-cli search --query shirt
//!
//! # Pick two products into a fresh list and print it as JSON
//! picker-cli pick --query shirt --product 77 --product 80
//!
//! # Pick with 15% off each picked row
//! picker-cli pick --query shirt --product 77 --discount 15 --discount-kind percent
//! ```
//!
//! # Commands
//!
//! - `search` - Fetch catalog pages and print one line per product
//! - `pick` - Check products by ID and print the resulting list
//!
//! # Environment Variables
//!
//! - `CATALOG_API_KEY` - API key for the catalog endpoint (required)
//! - `CATALOG_API_URL` - Catalog search endpoint
//! - `CATALOG_PAGE_SIZE` - Products per page (default 10)
//! - `CATALOG_CACHE_TTL_SECS` - Page cache TTL, 0 disables (default 300)
//! - `RUST_LOG` - Log filter (default `catalog_picker=info,picker_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use catalog_picker_core::DiscountKind;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "picker-cli")]
#[command(author, version, about = "Catalog picker tools")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch catalog pages and print the products
    Search {
        /// Search text (empty lists the whole catalog)
        #[arg(short, long, default_value = "")]
        query: String,

        /// Maximum number of pages to fetch
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Check products and print the resulting list as JSON
    Pick {
        /// Search text used to find the products
        #[arg(short, long, default_value = "")]
        query: String,

        /// Product ID to check (repeatable)
        #[arg(short, long = "product", required = true)]
        products: Vec<String>,

        /// List position to start writing at
        #[arg(long, default_value_t = 0)]
        at: usize,

        /// Stop scrolling after this many pages
        #[arg(long, default_value_t = 20)]
        max_pages: u32,

        /// Discount to attach to every picked row
        #[arg(long)]
        discount: Option<Decimal>,

        /// How the discount applies (`flat` or `percent`)
        #[arg(long, default_value = "flat")]
        discount_kind: DiscountKind,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("catalog_picker=info,picker_cli=info"));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Search { query, pages } => commands::search::run(&query, pages).await?,
        Commands::Pick {
            query,
            products,
            at,
            max_pages,
            discount,
            discount_kind,
        } => {
            let request = commands::pick::PickRequest {
                query: &query,
                product_ids: &products,
                at,
                max_pages,
                discount: discount.map(|value| (value, discount_kind)),
            };
            commands::pick::run(&request).await?;
        }
    }
    Ok(())
}
