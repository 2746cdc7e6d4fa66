//! Field extraction for a single search-result card.
//!
//! Each field is an ordered list of attempts over optional lookups: the
//! first attempt that yields usable text wins. A card that cannot produce a
//! title, a link, and a price is skipped, never emitted with blanks.

use std::sync::LazyLock;

use pricewalk_core::ProductRecord;
use regex::Regex;

use crate::browser::{BrowserError, Element};
use crate::selectors::{
    LINK_FALLBACK, LINK_PRIMARY, PRICE_CONTAINER, PRICE_FRACTION, PRICE_OFFSCREEN, PRICE_SYMBOL,
    PRICE_WHOLE, TITLE_FALLBACK, TITLE_PRIMARY,
};

/// A currency glyph, an optional space, then a two-decimal amount that may
/// carry thousands separators: `$1,299.99`, `€ 19.90`.
static PRICE_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([€$£])\s?(\d[\d,]*\.\d{2})").expect("valid price regex")
});

/// A price as found on the page: the amount without thousands separators
/// and the currency as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingTitle,
    MissingUrl,
    MissingPrice,
    /// The browser could not answer a lookup on this card.
    Malformed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingTitle => write!(f, "missing title"),
            SkipReason::MissingUrl => write!(f, "missing url"),
            SkipReason::MissingPrice => write!(f, "missing price"),
            SkipReason::Malformed(reason) => write!(f, "malformed listing: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Extracted(ProductRecord),
    Skipped(SkipReason),
}

/// Extracts one card into a [`ProductRecord`] tagged with `page` and
/// `position`, or the reason it was skipped.
///
/// Never fails: browser errors while reading this card become
/// [`SkipReason::Malformed`] so the rest of the page can still be read.
pub fn extract_product<E: Element>(product: &E, page: u32, position: u32) -> Extraction {
    match try_extract(product, page, position) {
        Ok(extraction) => extraction,
        Err(err) => Extraction::Skipped(SkipReason::Malformed(err.to_string())),
    }
}

fn try_extract<E: Element>(
    product: &E,
    page: u32,
    position: u32,
) -> Result<Extraction, BrowserError> {
    let Some(title) = extract_title(product)? else {
        return Ok(Extraction::Skipped(SkipReason::MissingTitle));
    };
    let Some(url) = extract_url(product)? else {
        return Ok(Extraction::Skipped(SkipReason::MissingUrl));
    };
    let Some(price) = extract_price(product)? else {
        return Ok(Extraction::Skipped(SkipReason::MissingPrice));
    };

    match ProductRecord::new(&title, &url, &price.amount, &price.currency, page, position) {
        Ok(record) => Ok(Extraction::Extracted(record)),
        Err(err) => Ok(Extraction::Skipped(SkipReason::Malformed(err.to_string()))),
    }
}

/// Title text from `h2 span`, else from `h2` itself.
///
/// # Errors
///
/// Propagates [`BrowserError`] from the underlying lookups.
pub fn extract_title<E: Element>(product: &E) -> Result<Option<String>, BrowserError> {
    let heading = match product.find(TITLE_PRIMARY)? {
        Some(span) => Some(span),
        None => product.find(TITLE_FALLBACK)?,
    };
    let Some(heading) = heading else {
        return Ok(None);
    };
    Ok(non_empty(heading.text()?.trim()))
}

/// Product link `href` from the styled result link, else any normal link.
///
/// # Errors
///
/// Propagates [`BrowserError`] from the underlying lookups.
pub fn extract_url<E: Element>(product: &E) -> Result<Option<String>, BrowserError> {
    let link = match product.find(LINK_PRIMARY)? {
        Some(link) => Some(link),
        None => product.find(LINK_FALLBACK)?,
    };
    let Some(link) = link else {
        return Ok(None);
    };
    Ok(link
        .attribute("href")?
        .and_then(|href| non_empty(href.trim())))
}

/// Price and currency for one card.
///
/// Without a price container the price is undetectable and nothing else is
/// tried. Inside it, a non-blank offscreen string decides the outcome on its
/// own; otherwise the whole/fraction parts are tried and the card's full
/// text is scanned last.
///
/// # Errors
///
/// Propagates [`BrowserError`] from the underlying lookups.
pub fn extract_price<E: Element>(product: &E) -> Result<Option<Price>, BrowserError> {
    let Some(container) = product.find(PRICE_CONTAINER)? else {
        return Ok(None);
    };

    if let Some(offscreen) = container.find(PRICE_OFFSCREEN)? {
        let text = offscreen.text()?;
        // A non-blank offscreen string is final, even if it holds no amount.
        if !text.trim().is_empty() {
            return Ok(parse_offscreen_price(&text));
        }
    }

    let whole = container.find(PRICE_WHOLE)?;
    let fraction = container.find(PRICE_FRACTION)?;
    if let (Some(whole), Some(fraction)) = (whole, fraction) {
        let symbol = match container.find(PRICE_SYMBOL)? {
            Some(symbol) => symbol.text()?,
            None => String::new(),
        };
        if let Some(price) = join_split_price(&whole.text()?, &fraction.text()?, &symbol) {
            return Ok(Some(price));
        }
    }

    Ok(scan_price_text(&product.text()?))
}

/// `"$1,299.99"` → amount `"1299.99"`, currency `"$"`. The first character
/// is taken as the currency.
#[must_use]
pub fn parse_offscreen_price(text: &str) -> Option<Price> {
    let mut chars = text.trim().chars();
    let currency = chars.next()?;
    let amount = chars.as_str().trim().replace(',', "");
    if amount.is_empty() {
        return None;
    }
    Some(Price {
        amount,
        currency: currency.to_string(),
    })
}

/// Joins separately rendered whole and fraction parts. Both parts and the
/// currency symbol must be present.
#[must_use]
pub fn join_split_price(whole: &str, fraction: &str, symbol: &str) -> Option<Price> {
    let whole = whole.replace(',', "");
    // The decimal point is usually rendered inside the whole part: "19."
    let whole = whole.trim().trim_end_matches('.').trim();
    let fraction = fraction.trim();
    let symbol = symbol.trim();
    if whole.is_empty() || fraction.is_empty() || symbol.is_empty() {
        return None;
    }
    Some(Price {
        amount: format!("{whole}.{fraction}"),
        currency: symbol.to_owned(),
    })
}

/// First `<glyph><amount>` pair anywhere in `text`.
#[must_use]
pub fn scan_price_text(text: &str) -> Option<Price> {
    let captures = PRICE_IN_TEXT.captures(text)?;
    Some(Price {
        amount: captures[2].replace(',', ""),
        currency: captures[1].to_owned(),
    })
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_owned())
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
