//! Substring search over the catalog.

use crate::catalog::CatalogItem;

/// Lazily yield the catalog items whose description contains `query`,
/// ignoring case, in catalog order.
///
/// A query that is blank after trimming matches nothing. A non-blank query is
/// matched as typed, surrounding whitespace included.
pub fn matches<'a>(
    query: &str,
    catalog: &'a [CatalogItem],
) -> impl Iterator<Item = &'a CatalogItem> + 'a {
    let needle = if query.trim().is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    };

    catalog.iter().filter(move |item| match &needle {
        Some(needle) => item.description.to_lowercase().contains(needle.as_str()),
        None => false,
    })
}

/// Collect the candidates for `query`.
pub fn filter(query: &str, catalog: &[CatalogItem]) -> Vec<CatalogItem> {
    matches(query, catalog).cloned().collect()
}
