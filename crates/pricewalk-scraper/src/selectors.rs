//! CSS selectors for the search-result markup the scraper understands.
//!
//! Titles, links, and prices each have a primary selector and a looser
//! fallback because result cards differ between locales and layouts.

/// One listing in the result grid.
pub const PRODUCT_CONTAINER: &str = "div[data-component-type='s-search-result']";

/// Typical desktop card: `<h2><span>Title</span></h2>`.
pub const TITLE_PRIMARY: &str = "h2 span";
pub const TITLE_FALLBACK: &str = "h2";

pub const LINK_PRIMARY: &str = "a.a-link-normal.s-link-style";
pub const LINK_FALLBACK: &str = "a.a-link-normal";

/// First span whose class mentions `a-price`; the current price precedes
/// any struck-through list price in document order.
pub const PRICE_CONTAINER: &str = "span[class*='a-price']";
/// Fully formatted price such as `$19.99`, present in markup for screen readers.
pub const PRICE_OFFSCREEN: &str = ".a-offscreen";
pub const PRICE_WHOLE: &str = ".a-price-whole";
pub const PRICE_FRACTION: &str = ".a-price-fraction";
pub const PRICE_SYMBOL: &str = ".a-price-symbol";

/// Enabled "next page" control. Disabled controls keep the base class and
/// add `s-pagination-disabled`.
pub const NEXT_PAGE: &str =
    "a[class*='s-pagination-next']:not([class*='s-pagination-disabled'])";
