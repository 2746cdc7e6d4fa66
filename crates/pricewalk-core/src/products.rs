use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::CoreError;

/// One product listing extracted from a search-result page.
///
/// Fields are private so a record cannot change after extraction; serde
/// serializes them in declaration order, which is also the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    title: String,
    url: String,
    /// Decimal string without thousands separators, e.g. `"1299.99"`.
    price: String,
    /// Currency glyph or short code as rendered, e.g. `"$"`. May be empty.
    currency: String,
    /// 1-based result page the listing was found on.
    page: u32,
    /// 1-based DOM index of the listing within its page.
    position: u32,
}

impl ProductRecord {
    /// Builds a record, trimming the title and checking the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRecord`] if the title, URL, or price is
    /// empty, or if `page`/`position` is zero.
    pub fn new(
        title: &str,
        url: &str,
        price: &str,
        currency: &str,
        page: u32,
        position: u32,
    ) -> Result<Self, CoreError> {
        let title = title.trim();
        let url = url.trim();
        let price = price.trim();

        let empty = |field: &'static str| CoreError::InvalidRecord {
            field,
            reason: "must not be empty".to_string(),
        };
        if title.is_empty() {
            return Err(empty("title"));
        }
        if url.is_empty() {
            return Err(empty("url"));
        }
        if price.is_empty() {
            return Err(empty("price"));
        }
        if page == 0 || position == 0 {
            return Err(CoreError::InvalidRecord {
                field: if page == 0 { "page" } else { "position" },
                reason: "is 1-based and must be at least 1".to_string(),
            });
        }

        Ok(Self {
            title: title.to_owned(),
            url: url.to_owned(),
            price: price.to_owned(),
            currency: currency.trim().to_owned(),
            page,
            position,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn price(&self) -> &str {
        &self.price
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Parses the textual price as a decimal. `None` if it is not numeric.
    #[must_use]
    pub fn price_value(&self) -> Option<Decimal> {
        Decimal::from_str(&self.price).ok()
    }
}

/// Post-hoc predicates applied to each page's records. Every field is
/// optional; an absent field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Case-insensitive substring the title must contain.
    pub title_contains: Option<String>,
}

impl ProductFilter {
    /// Returns `true` when no predicate is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_price.is_none() && self.max_price.is_none() && self.title_query().is_none()
    }

    /// The title needle lowercased, or `None` if absent or empty.
    #[must_use]
    pub fn title_query(&self) -> Option<String> {
        self.title_contains
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

/// Everything one aggregation run needs: where to start, when to stop,
/// and which records to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub url: String,
    pub max_pages: u32,
    pub max_products: Option<usize>,
    pub filter: ProductFilter,
}

impl ScrapeRequest {
    /// A single-page request with no product limit and no filters.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_pages: 1,
            max_products: None,
            filter: ProductFilter::default(),
        }
    }

    /// Checks the limits before any browser work starts.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRequest`] for an empty URL, a zero page or
    /// product limit, or a minimum price above the maximum.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.url.trim().is_empty() {
            return Err(CoreError::InvalidRequest("url must not be empty".into()));
        }
        if self.max_pages == 0 {
            return Err(CoreError::InvalidRequest(
                "max_pages must be at least 1".into(),
            ));
        }
        if self.max_products == Some(0) {
            return Err(CoreError::InvalidRequest(
                "max_products must be at least 1 when set".into(),
            ));
        }
        if let (Some(min), Some(max)) = (self.filter.min_price, self.filter.max_price) {
            if min > max {
                return Err(CoreError::InvalidRequest(format!(
                    "min_price {min} is greater than max_price {max}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "products_test.rs"]
mod tests;
