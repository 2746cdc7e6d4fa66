//! The narrow browser capability set the scraping core is written against.
//!
//! Extraction, pagination, and aggregation only ever see [`Browser`] and
//! [`Element`]. [`chrome::ChromeBrowser`] drives a real headless Chrome;
//! [`static_page::StaticBrowser`] answers the same queries from fixed HTML,
//! which keeps the core deterministic under test.

pub mod chrome;
pub mod static_page;

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("invalid selector \"{selector}\": {reason}")]
    Selector { selector: String, reason: String },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("browser driver failed during {operation}: {reason}")]
    Driver {
        operation: &'static str,
        reason: String,
    },

    #[error("no page has been loaded")]
    NoPage,

    #[error("I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of waiting for a selector to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    TimedOut,
}

/// A handle to one DOM element on the loaded page.
///
/// "Not found" is `Ok(None)` / an empty `Vec`; `Err` means the browser could
/// not answer at all (detached node, driver failure, bad selector).
pub trait Element: Sized {
    /// First descendant matching `selector`.
    fn find(&self, selector: &str) -> Result<Option<Self>, BrowserError>;

    /// All descendants matching `selector`, in document order.
    fn find_all(&self, selector: &str) -> Result<Vec<Self>, BrowserError>;

    /// Rendered text content with runs of whitespace collapsed.
    fn text(&self) -> Result<String, BrowserError>;

    /// Attribute value. For `href` this is the resolved absolute URL when
    /// the browser can resolve it.
    fn attribute(&self, name: &str) -> Result<Option<String>, BrowserError>;
}

/// A browser session holding exactly one loaded page.
pub trait Browser {
    type Element<'a>: Element
    where
        Self: 'a;

    /// Navigates to `url` and blocks until the navigation commits.
    fn load(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Serialized HTML of the current page.
    fn page_source(&self) -> Result<String, BrowserError>;

    /// All elements on the page matching `selector`, in document order.
    fn find_all(&self, selector: &str) -> Result<Vec<Self::Element<'_>>, BrowserError>;

    /// Activates `element`, preferring a programmatic click over a pointer
    /// event so overlays cannot intercept it.
    fn invoke(&self, element: &Self::Element<'_>) -> Result<(), BrowserError>;

    /// Blocks until `selector` matches at least one element or `timeout`
    /// elapses. After [`Browser::invoke`] the match may still come from the
    /// outgoing page if the navigation has not replaced it yet.
    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<Readiness, BrowserError>;
}
