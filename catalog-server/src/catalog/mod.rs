//! Catalog Module
//!
//! # Structure
//!
//! - [`filter`] - query predicate shared by every backend
//! - [`sort`] - sort keys and comparators, including article-stripped titles
//! - [`memory`] - in-memory backend used by tests and seeding demos
//! - [`sequence`] - stamps queries so stale responses can be discarded
//! - [`service`] - the query composer: filter, rank, suppress, paginate

pub mod filter;
pub mod memory;
pub mod sequence;
pub mod service;
pub mod sort;

pub use memory::{MemoryCatalog, MemorySales};
pub use sequence::QuerySequencer;
pub use service::BookService;

use crate::db::repository::RepoResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::Book;
use shared::query::BookQuery;
use std::collections::HashMap;

/// Ordering a backend can apply before returning rows
///
/// Demand-driven orderings (best-selling) and display orderings that
/// need normalization (article stripping) are applied by the service,
/// not the backend; those queries fetch with [`StoreOrder::Unspecified`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOrder {
    /// Title ascending, case-insensitive, id as tiebreak
    Title,
    /// Publication date descending, unknown dates last
    Newest,
    PriceAsc,
    PriceDesc,
    /// Deterministic backend order (id); the service sorts afterwards
    Unspecified,
}

/// Page window pushed down to the backend
#[derive(Debug, Clone, Copy)]
pub struct PageBounds {
    pub offset: u64,
    pub limit: u64,
}

/// Read access to the book catalog
///
/// Implementations apply the full [`BookQuery`] predicate, including
/// the unconditional removal of limited preorders whose window has
/// closed, so that `count` stays exact for any query.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch books matching the query, ordered, optionally windowed
    async fn fetch(
        &self,
        query: &BookQuery,
        order: StoreOrder,
        bounds: Option<PageBounds>,
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<Book>>;

    /// Count books matching the query
    async fn count(&self, query: &BookQuery, now: DateTime<Utc>) -> RepoResult<u64>;

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Book>>;

    async fn find_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>>;
}

/// Read access to historical sales, used only as a demand signal
///
/// Bulk order lines (quantity above the threshold) are excluded from
/// both aggregates; a school buying a classroom set is not demand.
#[async_trait]
pub trait SalesHistory: Send + Sync {
    /// Total non-bulk quantity sold per ISBN, all time
    async fn non_bulk_totals(&self) -> RepoResult<HashMap<String, i64>>;

    /// Most recent non-bulk sale per ISBN
    async fn last_qualifying_sales(&self) -> RepoResult<HashMap<String, DateTime<Utc>>>;
}
