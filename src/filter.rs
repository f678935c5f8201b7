//! Pure filtering of the catalog against the current criteria.

use crate::catalog::Item;
use crate::criteria::Criteria;

/// Items passing both the toggle and the search predicate, in fetch order.
///
/// Toggles are applied first, then the case-insensitive search over title
/// and creator. An empty (after trimming) search passes everything.
pub fn filter_items<'a>(items: &'a [Item], criteria: &Criteria) -> Vec<&'a Item> {
    let needle = criteria.search_term().to_lowercase();

    items
        .iter()
        .filter(|item| criteria.filters.accepts(item.pricing))
        .filter(|item| needle.is_empty() || matches_search(item, &needle))
        .collect()
}

/// `needle` must already be lowercased.
fn matches_search(item: &Item, needle: &str) -> bool {
    item.title.to_lowercase().contains(needle) || item.creator.to_lowercase().contains(needle)
}
