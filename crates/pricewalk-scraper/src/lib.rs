pub mod aggregate;
pub mod browser;
pub mod error;
pub mod extract;
pub mod filter;
pub mod page;
pub mod pagination;
pub mod selectors;

pub use aggregate::{scrape_listing, scrape_with_session, ScrapeOptions};
pub use browser::chrome::{ChromeBrowser, ChromeOptions};
pub use browser::static_page::StaticBrowser;
pub use browser::{Browser, BrowserError, Element, Readiness};
pub use error::ScraperError;
pub use extract::{extract_product, Extraction, Price, SkipReason};
pub use filter::apply_filters;
pub use page::{scrape_page, PageScrape};
pub use pagination::NextPage;
