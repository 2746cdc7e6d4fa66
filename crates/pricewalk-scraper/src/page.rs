//! Scraping every product card on the currently loaded page.

use pricewalk_core::ProductRecord;

use crate::browser::{Browser, BrowserError};
use crate::extract::{extract_product, Extraction};
use crate::selectors::PRODUCT_CONTAINER;

/// Result of scraping one page: the usable records in document order and
/// how many cards were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageScrape {
    pub records: Vec<ProductRecord>,
    pub skipped: usize,
}

/// Runs the field extractor over every product card on the loaded page.
///
/// `position` is the card's 1-based DOM index, so a skipped card still
/// consumes its index and survivors keep their true position.
///
/// # Errors
///
/// Returns [`BrowserError`] only if the cards cannot be enumerated at all.
/// Failures on individual cards are counted in [`PageScrape::skipped`].
pub fn scrape_page<B: Browser>(browser: &B, page: u32) -> Result<PageScrape, BrowserError> {
    let containers = browser.find_all(PRODUCT_CONTAINER)?;
    tracing::info!(page, count = containers.len(), "found product elements on the page");

    let mut scrape = PageScrape::default();
    for (position, container) in (1u32..).zip(containers.iter()) {
        match extract_product(container, page, position) {
            Extraction::Extracted(record) => scrape.records.push(record),
            Extraction::Skipped(reason) => {
                tracing::debug!(page, position, %reason, "skipping product");
                scrape.skipped += 1;
            }
        }
    }

    tracing::info!(
        page,
        parsed = scrape.records.len(),
        "parsed products with prices on this page"
    );
    if scrape.skipped > 0 {
        tracing::info!(page, skipped = scrape.skipped, "skipped unusable products");
    }
    Ok(scrape)
}
