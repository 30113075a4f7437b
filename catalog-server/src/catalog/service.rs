//! Book service — the storefront query composer
//!
//! Composes one listing as filter, rank, suppress, paginate, in that
//! order, and guarantees that `count` equals the sum of page lengths
//! for the same query. Read failures degrade to empty results rather
//! than surfacing as errors; the storefront stays up when the catalog
//! is unreachable.

use chrono::{DateTime, Duration, Utc};
use shared::models::{Availability, Book};
use shared::query::{BookQuery, PaginatedResponse};
use shared::SortKey;
use std::collections::HashMap;
use std::sync::Arc;

use super::{CatalogStore, PageBounds, QuerySequencer, SalesHistory, StoreOrder};
use crate::catalog::sort;

/// A hardcover with no qualifying sale in this window is stale
const STALE_WINDOW_DAYS: i64 = 365;

/// Maximum results returned by free-text search
const SEARCH_LIMIT: u64 = 20;

/// Fallback when an availability check cannot reach the catalog:
/// assume sellable rather than blocking the purchase
const FAIL_OPEN_STOCK: i64 = 10;

/// Catalog query service
pub struct BookService {
    store: Arc<dyn CatalogStore>,
    sales: Arc<dyn SalesHistory>,
    sequencer: QuerySequencer,
}

impl BookService {
    pub fn new(store: Arc<dyn CatalogStore>, sales: Arc<dyn SalesHistory>) -> Self {
        Self {
            store,
            sales,
            sequencer: QuerySequencer::new(),
        }
    }

    /// List books for a query, evaluated now
    pub async fn list(&self, query: &BookQuery) -> PaginatedResponse<Book> {
        self.list_at(query, Utc::now()).await
    }

    /// List books for a query at the given instant
    ///
    /// When no post-fetch suppression can shrink the page, ordering and
    /// pagination are pushed down to the backend and only one page is
    /// materialized. Otherwise the full match set is fetched, ranked
    /// and windowed here so the reported total stays exact.
    pub async fn list_at(&self, query: &BookQuery, now: DateTime<Utc>) -> PaginatedResponse<Book> {
        let pushdown =
            sort::pushdown_order(query.sort_by).filter(|_| !query.hide_stale_hardcovers);

        let result = match pushdown {
            Some(order) => self.list_pushdown(query, order, now).await,
            None => self.list_composed(query, now).await,
        };

        match result {
            Ok(page) => page,
            Err(e) => {
                tracing::error!("Catalog listing failed, returning empty page: {e}");
                PaginatedResponse::new(vec![], 0, query.offset, query.limit)
            }
        }
    }

    async fn list_pushdown(
        &self,
        query: &BookQuery,
        order: StoreOrder,
        now: DateTime<Utc>,
    ) -> crate::db::repository::RepoResult<PaginatedResponse<Book>> {
        let total = self.store.count(query, now).await?;
        let data = match query.limit {
            Some(limit) => {
                let bounds = PageBounds {
                    offset: query.offset,
                    limit,
                };
                self.store.fetch(query, order, Some(bounds), now).await?
            }
            None => {
                let all = self.store.fetch(query, order, None, now).await?;
                all.into_iter().skip(query.offset as usize).collect()
            }
        };
        Ok(PaginatedResponse::new(data, total, query.offset, query.limit))
    }

    async fn list_composed(
        &self,
        query: &BookQuery,
        now: DateTime<Utc>,
    ) -> crate::db::repository::RepoResult<PaginatedResponse<Book>> {
        let mut books = self
            .store
            .fetch(query, StoreOrder::Unspecified, None, now)
            .await?;

        let sales_totals = if query.sort_by == SortKey::BestSelling {
            match self.sales.non_bulk_totals().await {
                Ok(totals) => totals,
                Err(e) => {
                    tracing::warn!("Sales totals unavailable, best-seller rank degrades: {e}");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };
        sort::sort_books(&mut books, query.sort_by, &sales_totals);

        if query.hide_stale_hardcovers {
            books = self.suppress_stale_hardcovers(books, now).await;
        }

        let total = books.len() as u64;
        let start = (query.offset as usize).min(books.len());
        let end = match query.limit {
            Some(limit) => (start + limit as usize).min(books.len()),
            None => books.len(),
        };
        let data = books[start..end].to_vec();
        Ok(PaginatedResponse::new(data, total, query.offset, query.limit))
    }

    /// Drop zero-stock hardcovers with no qualifying sale inside the
    /// stale window. If sales history is unreachable no book is
    /// dropped; hiding sellable stock is worse than showing stale.
    async fn suppress_stale_hardcovers(
        &self,
        books: Vec<Book>,
        now: DateTime<Utc>,
    ) -> Vec<Book> {
        let last_sales = match self.sales.last_qualifying_sales().await {
            Ok(sales) => sales,
            Err(e) => {
                tracing::warn!("Sales history unavailable, skipping stale suppression: {e}");
                return books;
            }
        };
        let cutoff = now - Duration::days(STALE_WINDOW_DAYS);
        books
            .into_iter()
            .filter(|book| {
                if !book.is_hardcover() || book.is_preorder || book.available() > 0 {
                    return true;
                }
                book.isbn
                    .as_deref()
                    .and_then(|isbn| last_sales.get(isbn))
                    .is_some_and(|&sold_at| sold_at >= cutoff)
            })
            .collect()
    }

    /// Count books matching a query, consistent with [`list`](Self::list)
    pub async fn count(&self, query: &BookQuery) -> u64 {
        self.count_at(query, Utc::now()).await
    }

    pub async fn count_at(&self, query: &BookQuery, now: DateTime<Utc>) -> u64 {
        if query.hide_stale_hardcovers {
            // Suppression happens after the fetch, so the exact count
            // has to run the same composition without a page window
            let mut unwindowed = query.clone();
            unwindowed.offset = 0;
            unwindowed.limit = None;
            return self.list_at(&unwindowed, now).await.total;
        }
        match self.store.count(query, now).await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!("Catalog count failed, returning zero: {e}");
                0
            }
        }
    }

    /// Look up one book by id. Expired limited preorders stay reachable
    /// here even though listings hide them.
    pub async fn get_book(&self, id: &str) -> Option<Book> {
        match self.store.find_by_id(id).await {
            Ok(book) => book,
            Err(e) => {
                tracing::error!("Book lookup failed for {id}: {e}");
                None
            }
        }
    }

    pub async fn get_book_by_isbn(&self, isbn: &str) -> Option<Book> {
        match self.store.find_by_isbn(isbn).await {
            Ok(book) => book,
            Err(e) => {
                tracing::error!("Book lookup failed for ISBN {isbn}: {e}");
                None
            }
        }
    }

    /// Stock check for the product page. Fails open: when the catalog
    /// cannot answer, the book is reported as sellable.
    pub async fn availability(&self, id: &str) -> Availability {
        match self.store.find_by_id(id).await {
            Ok(Some(book)) => Availability {
                available: book.available() > 0,
                in_stock: book.available(),
                reserved: book.reserved_count,
            },
            Ok(None) | Err(_) => Availability {
                available: true,
                in_stock: FAIL_OPEN_STOCK,
                reserved: 0,
            },
        }
    }

    /// Current staff picks, default order, capped at `limit`
    pub async fn staff_picks(&self, limit: u64) -> Vec<Book> {
        self.list(&BookQuery::all().staff_picks().paginate(0, limit))
            .await
            .data
    }

    /// Free-text search over title and author
    pub async fn search(&self, term: &str) -> Vec<Book> {
        let query = BookQuery::all().matching(term).paginate(0, SEARCH_LIMIT);
        self.list(&query).await.data
    }

    /// Take a ticket for a listing that may be superseded
    pub fn begin_query(&self) -> u64 {
        self.sequencer.begin()
    }

    /// Run a listing, returning `None` if a newer query started while
    /// this one was in flight. Superseded results must be discarded.
    pub async fn list_if_current(
        &self,
        query: &BookQuery,
        ticket: u64,
    ) -> Option<PaginatedResponse<Book>> {
        let page = self.list(query).await;
        if self.sequencer.is_current(ticket) {
            Some(page)
        } else {
            tracing::debug!("Discarding superseded catalog query (ticket {ticket})");
            None
        }
    }
}
