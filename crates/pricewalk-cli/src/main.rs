mod export;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pricewalk_core::{ProductFilter, ScrapeRequest};
use pricewalk_scraper::{
    scrape_with_session, Browser, BrowserError, ChromeBrowser, ChromeOptions, ScrapeOptions,
};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pricewalk")]
#[command(about = "Scrape product prices from a search or category results page")]
struct Cli {
    /// Full URL of the search or category page to scrape
    #[arg(long)]
    url: String,

    /// Output CSV file
    #[arg(long, default_value = "product_prices.csv")]
    output: PathBuf,

    /// Maximum number of result pages to scrape
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: u32,

    /// Maximum number of products to collect in total
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_products: Option<u64>,

    /// Minimum price filter (e.g. 10.0)
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Maximum price filter (e.g. 50.0)
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Only keep products whose title contains this text (case-insensitive)
    #[arg(long)]
    title_contains: Option<String>,
}

impl Cli {
    fn scrape_request(&self) -> anyhow::Result<ScrapeRequest> {
        let max_products = self
            .max_products
            .map(usize::try_from)
            .transpose()
            .context("--max-products is too large for this platform")?;
        Ok(ScrapeRequest {
            url: self.url.clone(),
            max_pages: self.max_pages,
            max_products,
            filter: ProductFilter {
                min_price: self.min_price,
                max_price: self.max_price,
                title_contains: self.title_contains.clone(),
            },
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = pricewalk_core::load_app_config().context("failed to load configuration")?;
    init_tracing(&config.log_level);

    let chrome = ChromeOptions::from(&config);
    let options = ScrapeOptions::from(&config);
    run(&cli, || ChromeBrowser::launch(&chrome), &options)?;
    Ok(())
}

/// Scrapes with a browser from `connect` and writes the CSV. Returns the
/// number of rows written.
fn run<B, F>(cli: &Cli, connect: F, options: &ScrapeOptions) -> anyhow::Result<usize>
where
    B: Browser,
    F: FnOnce() -> Result<B, BrowserError>,
{
    let request = cli.scrape_request()?;
    let records = scrape_with_session(connect, &request, options)
        .with_context(|| format!("failed to scrape {}", request.url))?;

    let written = export::write_csv(&records, &cli.output)?;
    if written == 0 {
        tracing::warn!("no products found; nothing to save");
    } else {
        tracing::info!(count = written, path = %cli.output.display(), "saved products");
    }
    Ok(written)
}

fn init_tracing(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
