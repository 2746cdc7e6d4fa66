//! Post-hoc filtering of extracted records.

use pricewalk_core::{ProductFilter, ProductRecord};

/// Keeps the records that satisfy every predicate set on `filter`.
///
/// With no predicates the input is handed back untouched. Once any
/// predicate is set, records whose price does not parse as a decimal are
/// dropped.
#[must_use]
pub fn apply_filters(records: Vec<ProductRecord>, filter: &ProductFilter) -> Vec<ProductRecord> {
    if filter.is_empty() {
        return records;
    }

    let query = filter.title_query();
    records
        .into_iter()
        .filter(|record| matches_filter(record, filter, query.as_deref()))
        .collect()
}

/// `query` is the already-lowercased title needle from
/// [`ProductFilter::title_query`].
fn matches_filter(record: &ProductRecord, filter: &ProductFilter, query: Option<&str>) -> bool {
    if let Some(query) = query {
        if !record.title().to_lowercase().contains(query) {
            return false;
        }
    }

    let Some(value) = record.price_value() else {
        return false;
    };
    if filter.min_price.is_some_and(|min| value < min) {
        return false;
    }
    if filter.max_price.is_some_and(|max| value > max) {
        return false;
    }
    true
}
