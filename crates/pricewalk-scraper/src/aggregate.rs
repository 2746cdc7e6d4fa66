//! The multi-page scrape loop.
//!
//! Load the start URL, then repeatedly scrape the page, filter it, append
//! to the result, and either stop (product limit, page limit, no next page)
//! or click through to the next page. The page counter only ever grows and
//! is capped by `max_pages`, so the loop always terminates.

use std::path::{Path, PathBuf};
use std::time::Duration;

use pricewalk_core::{AppConfig, ProductRecord, ScrapeRequest};

use crate::browser::{Browser, BrowserError};
use crate::error::ScraperError;
use crate::filter::apply_filters;
use crate::page::scrape_page;
use crate::pagination::{advance, wait_for_products, NextPage, DEFAULT_READY_TIMEOUT};

/// Knobs for a scrape run that are not part of the request itself.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub ready_timeout: Duration,
    /// Where to write the first page's HTML for selector debugging.
    pub debug_html_path: Option<PathBuf>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            ready_timeout: DEFAULT_READY_TIMEOUT,
            debug_html_path: None,
        }
    }
}

impl From<&AppConfig> for ScrapeOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            ready_timeout: config.ready_timeout(),
            debug_html_path: config.debug_html_path.clone(),
        }
    }
}

/// Acquires a browser from `connect`, runs [`scrape_listing`] with it, and
/// releases it on every exit path.
///
/// The request is validated before the browser is started.
///
/// # Errors
///
/// Returns [`ScraperError::Request`] for an invalid request and
/// [`ScraperError::Browser`] if the browser cannot be started or fails
/// before the first page is scraped.
pub fn scrape_with_session<B, F>(
    connect: F,
    request: &ScrapeRequest,
    options: &ScrapeOptions,
) -> Result<Vec<ProductRecord>, ScraperError>
where
    B: Browser,
    F: FnOnce() -> Result<B, BrowserError>,
{
    request.validate()?;
    let mut browser = connect()?;
    scrape_listing(&mut browser, request, options)
}

/// Scrapes up to `request.max_pages` result pages starting at
/// `request.url`, returning the filtered records in page order.
///
/// Once the first page has been scraped, later browser failures end the
/// run early and the records gathered so far are returned.
///
/// # Errors
///
/// Returns [`ScraperError::Request`] for an invalid request and
/// [`ScraperError::Browser`] if loading or scraping the first page fails.
pub fn scrape_listing<B: Browser>(
    browser: &mut B,
    request: &ScrapeRequest,
    options: &ScrapeOptions,
) -> Result<Vec<ProductRecord>, ScraperError> {
    request.validate()?;

    tracing::info!(url = %request.url, max_pages = request.max_pages, "opening listing page");
    browser.load(&request.url)?;
    wait_for_products(browser, options.ready_timeout)?;

    if let Some(path) = &options.debug_html_path {
        dump_page_source(browser, path);
    }

    let mut collected: Vec<ProductRecord> = Vec::new();
    let mut page = 1u32;

    loop {
        let scraped = match scrape_page(browser, page) {
            Ok(scraped) => scraped,
            Err(err) if page > 1 => {
                tracing::warn!(page, error = %err, "failed to scrape page; keeping earlier pages");
                break;
            }
            Err(err) => return Err(err.into()),
        };

        collected.extend(apply_filters(scraped.records, &request.filter));

        if let Some(max) = request.max_products {
            if collected.len() >= max {
                collected.truncate(max);
                tracing::info!(max_products = max, "reached product limit");
                break;
            }
        }

        if page >= request.max_pages {
            break;
        }

        match advance(browser, options.ready_timeout) {
            Ok(NextPage::HasNext) => page += 1,
            Ok(NextPage::NoNext) => break,
            Err(err) => {
                tracing::warn!(page, error = %err, "pagination failed; keeping earlier pages");
                break;
            }
        }
    }

    tracing::info!(
        pages = page,
        products = collected.len(),
        "finished scraping"
    );
    Ok(collected)
}

/// Writes the current page source to `path`. Failures are logged only.
fn dump_page_source<B: Browser>(browser: &B, path: &Path) {
    let written = browser.page_source().and_then(|html| {
        std::fs::write(path, html).map_err(|source| BrowserError::Io {
            path: path.display().to_string(),
            source,
        })
    });
    match written {
        Ok(()) => tracing::info!(path = %path.display(), "saved a copy of the first page HTML"),
        Err(err) => tracing::warn!(path = %path.display(), error = %err, "failed to save debug HTML copy"),
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
