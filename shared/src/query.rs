//! Catalog query request types
//!
//! A [`BookQuery`] is a pure value describing one listing request:
//! filters, sort key and pagination bounds. Absent fields mean "no
//! constraint". The query owns nothing and is rebuilt per request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sort key for catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Publication date descending, unknown dates last
    Newest,
    PriceAsc,
    PriceDesc,
    /// Title ascending with leading articles stripped
    Alphabetical,
    /// Author ascending, case-insensitive
    Author,
    /// Non-bulk quantity sold descending
    BestSelling,
    /// Default order: title ascending, case-insensitive
    #[default]
    Title,
}

/// Filter value denoting "no constraint" for category/genre/format
const ANY: &str = "All";

/// Query request for catalog listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default)]
    pub in_stock_only: bool,
    #[serde(default)]
    pub staff_picks_only: bool,
    #[serde(default)]
    pub preorder_only: bool,
    /// Case-insensitive substring match on title OR author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: SortKey,
    /// Inclusive lower price bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_min: Option<Decimal>,
    /// Inclusive upper price bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_max: Option<Decimal>,
    /// Drop zero-stock hardcovers with no qualifying sale in a year
    #[serde(default)]
    pub hide_stale_hardcovers: bool,
    #[serde(default)]
    pub offset: u64,
    /// Page size; absent returns all remaining items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl BookQuery {
    /// Create an unconstrained query (all books, default order)
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn in_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn in_stock(mut self) -> Self {
        self.in_stock_only = true;
        self
    }

    pub fn staff_picks(mut self) -> Self {
        self.staff_picks_only = true;
        self
    }

    pub fn preorders(mut self) -> Self {
        self.preorder_only = true;
        self
    }

    pub fn matching(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn order_by(mut self, sort_by: SortKey) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Explicit inclusive price bounds
    pub fn priced(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.price_min = min;
        self.price_max = max;
        self
    }

    /// Price bounds from the legacy storefront slider, where a minimum
    /// at or below 0 and a maximum at or above 100 mean "unbounded".
    /// New callers should use [`priced`](Self::priced) with explicit
    /// `Option` bounds instead of the sentinel values.
    pub fn priced_from_slider(mut self, min: Decimal, max: Decimal) -> Self {
        self.price_min = (min > Decimal::ZERO).then_some(min);
        self.price_max = (max < Decimal::ONE_HUNDRED).then_some(max);
        self
    }

    pub fn without_stale_hardcovers(mut self) -> Self {
        self.hide_stale_hardcovers = true;
        self
    }

    /// Add pagination bounds
    pub fn paginate(mut self, offset: u64, limit: u64) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    /// Category constraint, unless the value denotes "any"
    pub fn category_filter(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| *c != ANY)
    }

    /// Genre constraint, unless the value denotes "any" ("All", "All Fiction", ...)
    pub fn genre_filter(&self) -> Option<&str> {
        self.genre
            .as_deref()
            .filter(|g| *g != ANY && !g.starts_with("All "))
    }

    /// Format constraint, unless the value denotes "any"
    pub fn format_filter(&self) -> Option<&str> {
        self.format.as_deref().filter(|f| *f != ANY)
    }

    /// Search term, trimmed; blank means unconstrained
    pub fn search_filter(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Page of results with the total match count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    /// Total matches across all pages
    pub total: u64,
    pub offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, offset: u64, limit: Option<u64>) -> Self {
        Self {
            data,
            total,
            offset,
            limit,
        }
    }

    /// Single unpaginated page
    pub fn single_page(data: Vec<T>) -> Self {
        let total = data.len() as u64;
        Self {
            data,
            total,
            offset: 0,
            limit: None,
        }
    }
}
