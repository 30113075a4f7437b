//! Sort keys and comparators for catalog listings
//!
//! Shelf-style alphabetical order ignores a leading English article, so
//! "The Great Gatsby" files under G. Every comparator falls back to the
//! book id so equal keys still produce a stable, deterministic order.

use shared::models::Book;
use shared::query::SortKey;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::StoreOrder;

/// Leading articles ignored by shelf-style alphabetical order
const ARTICLES: [&str; 3] = ["the ", "a ", "an "];

/// Normalized title key with any leading article stripped
pub fn title_sort_key(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    for article in ARTICLES {
        if let Some(rest) = lowered.strip_prefix(article) {
            return rest.trim_start().to_string();
        }
    }
    lowered
}

/// Author key: surname first, then the full name, so "Douglas Adams"
/// files under A and two Christies stay together
pub fn author_sort_key(author: &str) -> (String, String) {
    let lowered = author.trim().to_lowercase();
    let surname = lowered
        .split_whitespace()
        .next_back()
        .unwrap_or_default()
        .to_string();
    (surname, lowered)
}

/// Backend ordering for a sort key, if it can be pushed down
///
/// Alphabetical, author and best-selling orders need normalization or
/// sales data the backend does not have; they return `None` and the
/// service sorts fetched rows itself.
pub fn pushdown_order(key: SortKey) -> Option<StoreOrder> {
    match key {
        SortKey::Title => Some(StoreOrder::Title),
        SortKey::Newest => Some(StoreOrder::Newest),
        SortKey::PriceAsc => Some(StoreOrder::PriceAsc),
        SortKey::PriceDesc => Some(StoreOrder::PriceDesc),
        SortKey::Alphabetical | SortKey::Author | SortKey::BestSelling => None,
    }
}

fn by_id(a: &Book, b: &Book) -> Ordering {
    a.id.cmp(&b.id)
}

fn by_title(a: &Book, b: &Book) -> Ordering {
    a.title.to_lowercase().cmp(&b.title.to_lowercase())
}

/// Sort books in place by the given key
///
/// `sales_totals` holds non-bulk quantity sold per ISBN and is only
/// consulted for best-selling order; books without sales rank as zero.
pub fn sort_books(books: &mut [Book], key: SortKey, sales_totals: &HashMap<String, i64>) {
    match key {
        SortKey::Title => books.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| by_id(a, b))
        }),
        SortKey::Alphabetical => books.sort_by(|a, b| {
            title_sort_key(&a.title)
                .cmp(&title_sort_key(&b.title))
                .then_with(|| by_id(a, b))
        }),
        SortKey::Author => books.sort_by(|a, b| {
            // Same author: shelf order by title
            author_sort_key(&a.author)
                .cmp(&author_sort_key(&b.author))
                .then_with(|| title_sort_key(&a.title).cmp(&title_sort_key(&b.title)))
                .then_with(|| by_id(a, b))
        }),
        SortKey::Newest => books.sort_by(|a, b| {
            // Descending by date, books without a date last
            match (a.publication_date, b.publication_date) {
                (Some(da), Some(db)) => db.cmp(&da),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| by_title(a, b))
            .then_with(|| by_id(a, b))
        }),
        SortKey::PriceAsc => books.sort_by(|a, b| {
            a.price
                .cmp(&b.price)
                .then_with(|| by_title(a, b))
                .then_with(|| by_id(a, b))
        }),
        SortKey::PriceDesc => books.sort_by(|a, b| {
            b.price
                .cmp(&a.price)
                .then_with(|| by_title(a, b))
                .then_with(|| by_id(a, b))
        }),
        SortKey::BestSelling => books.sort_by(|a, b| {
            let sold = |book: &Book| {
                book.isbn
                    .as_deref()
                    .and_then(|isbn| sales_totals.get(isbn))
                    .copied()
                    .unwrap_or(0)
            };
            sold(b)
                .cmp(&sold(a))
                .then_with(|| title_sort_key(&a.title).cmp(&title_sort_key(&b.title)))
                .then_with(|| by_id(a, b))
        }),
    }
}
