//! In-memory catalog and sales backends
//!
//! Used by the test suite and by development seeding. Behavior mirrors
//! the SQL backend exactly: same predicate, same orderings, same
//! tiebreaks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::models::{Book, OrderLine};
use shared::query::{BookQuery, SortKey};
use std::collections::HashMap;

use super::{CatalogStore, PageBounds, SalesHistory, StoreOrder};
use crate::catalog::{filter, sort};
use crate::db::repository::RepoResult;

/// In-memory book catalog
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    books: RwLock<Vec<Book>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: RwLock::new(books),
        }
    }

    pub fn insert(&self, book: Book) {
        self.books.write().push(book);
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn fetch(
        &self,
        query: &BookQuery,
        order: StoreOrder,
        bounds: Option<PageBounds>,
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<Book>> {
        let mut matched: Vec<Book> = self
            .books
            .read()
            .iter()
            .filter(|b| filter::matches(b, query, now))
            .cloned()
            .collect();

        match order {
            StoreOrder::Title => sort::sort_books(&mut matched, SortKey::Title, &HashMap::new()),
            StoreOrder::Newest => sort::sort_books(&mut matched, SortKey::Newest, &HashMap::new()),
            StoreOrder::PriceAsc => {
                sort::sort_books(&mut matched, SortKey::PriceAsc, &HashMap::new())
            }
            StoreOrder::PriceDesc => {
                sort::sort_books(&mut matched, SortKey::PriceDesc, &HashMap::new())
            }
            StoreOrder::Unspecified => matched.sort_by(|a, b| a.id.cmp(&b.id)),
        }

        if let Some(bounds) = bounds {
            let start = (bounds.offset as usize).min(matched.len());
            let end = (start + bounds.limit as usize).min(matched.len());
            matched = matched[start..end].to_vec();
        }

        Ok(matched)
    }

    async fn count(&self, query: &BookQuery, now: DateTime<Utc>) -> RepoResult<u64> {
        let count = self
            .books
            .read()
            .iter()
            .filter(|b| filter::matches(b, query, now))
            .count();
        Ok(count as u64)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Book>> {
        Ok(self.books.read().iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>> {
        Ok(self
            .books
            .read()
            .iter()
            .find(|b| b.isbn.as_deref() == Some(isbn))
            .cloned())
    }
}

/// In-memory sales history
#[derive(Debug, Default)]
pub struct MemorySales {
    lines: RwLock<Vec<OrderLine>>,
}

impl MemorySales {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lines(lines: Vec<OrderLine>) -> Self {
        Self {
            lines: RwLock::new(lines),
        }
    }

    pub fn record(&self, line: OrderLine) {
        self.lines.write().push(line);
    }
}

#[async_trait]
impl SalesHistory for MemorySales {
    async fn non_bulk_totals(&self) -> RepoResult<HashMap<String, i64>> {
        let mut totals = HashMap::new();
        for line in self.lines.read().iter().filter(|l| !l.is_bulk()) {
            *totals.entry(line.isbn.clone()).or_insert(0) += line.quantity;
        }
        Ok(totals)
    }

    async fn last_qualifying_sales(&self) -> RepoResult<HashMap<String, DateTime<Utc>>> {
        let mut latest: HashMap<String, DateTime<Utc>> = HashMap::new();
        for line in self.lines.read().iter().filter(|l| !l.is_bulk()) {
            latest
                .entry(line.isbn.clone())
                .and_modify(|at| *at = (*at).max(line.ordered_at))
                .or_insert(line.ordered_at);
        }
        Ok(latest)
    }
}
