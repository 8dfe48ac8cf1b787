//! Client-side pagination and title search over the catalog.
//!
//! The catalog backend only serves the whole collection, so paging and
//! filtering happen here after the fetch.

use crate::models::Movie;

/// Movies per catalog page.
pub const PAGE_SIZE: usize = 10;

/// One page of catalog results. Transient, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub items: Vec<Movie>,
    pub has_more: bool,
    /// 1-based.
    pub page_number: u32,
    pub query: Option<String>,
}

/// Collapse a blank search string into "no query".
pub fn normalize_query(query: Option<&str>) -> Option<String> {
    query.filter(|q| !q.trim().is_empty()).map(str::to_owned)
}

/// Filter `movies` by `query` (case-insensitive title substring) and cut out
/// page `page_number`. Page 0 is read as page 1; pages past the end come
/// back empty with `has_more == false`.
pub fn paginate(movies: Vec<Movie>, page_number: u32, query: Option<&str>) -> CatalogPage {
    let query = normalize_query(query);
    let page_number = page_number.max(1);

    let matches: Vec<Movie> = match &query {
        Some(q) => {
            let needle = q.to_lowercase();
            movies
                .into_iter()
                .filter(|m| m.title_contains(&needle))
                .collect()
        }
        None => movies,
    };

    let total = matches.len();
    let start = (page_number as usize - 1).saturating_mul(PAGE_SIZE);
    let end = start.saturating_add(PAGE_SIZE);
    let items = if start >= total {
        Vec::new()
    } else {
        matches
            .into_iter()
            .skip(start)
            .take(PAGE_SIZE)
            .collect()
    };

    CatalogPage {
        items,
        has_more: end < total,
        page_number,
        query,
    }
}
