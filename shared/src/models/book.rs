//! Book Model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fallback cover reference when a record carries none
pub const PLACEHOLDER_COVER: &str = "/images/covers/placeholder.jpg";

/// Fallback category when a record carries none
pub const DEFAULT_CATEGORY: &str = "Fiction";

/// Fallback genre when a record carries none
pub const DEFAULT_GENRE: &str = "Literary";

/// Fallback format when a record carries none
pub const DEFAULT_FORMAT: &str = "Paperback";

/// Available stock at or below this threshold shows as low stock
const LOW_STOCK_THRESHOLD: i64 = 3;

/// Display status of a book, derived from its stored fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    /// Zero available stock, restockable on demand
    #[serde(rename = "Ships in X days")]
    BackOrdered,
    #[serde(rename = "Preorder")]
    Preorder,
    #[serde(rename = "Preorder Closed")]
    PreorderClosed,
}

/// Customer review attached to a book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub reviewer: String,
    /// Star rating, 1-5
    pub rating: u8,
    pub text: String,
}

/// Book entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub isbn: Option<String>,
    pub title: String,
    pub author: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Cover image reference
    pub cover: String,
    pub category: String,
    pub genre: String,
    /// Binding format ("Hardcover", "Paperback", ...)
    pub format: String,
    pub inventory_count: i64,
    pub reserved_count: i64,
    pub publication_date: Option<NaiveDate>,
    /// General preorder flag (the title has not shipped yet)
    pub is_preorder: bool,
    /// Limited special edition with its own preorder window
    pub is_limited_preorder: bool,
    /// Preorder window close, present for limited preorders
    pub preorder_cutoff_date: Option<DateTime<Utc>>,
    pub is_staff_pick: bool,
    pub staff_reviewer: Option<String>,
    pub staff_quote: Option<String>,
    pub page_count: Option<i64>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Book {
    /// Stock available for sale. Reserved copies exceeding inventory are
    /// a data-quality issue upstream; the count clamps at zero.
    pub fn available(&self) -> i64 {
        (self.inventory_count - self.reserved_count).max(0)
    }

    /// Whether this book is a hardcover edition
    pub fn is_hardcover(&self) -> bool {
        self.format.eq_ignore_ascii_case("Hardcover")
    }

    /// Derive the display status at the given instant
    pub fn status(&self, now: DateTime<Utc>) -> BookStatus {
        if self.is_preorder {
            if self.is_limited_preorder
                && let Some(cutoff) = self.preorder_cutoff_date
                && now > cutoff
            {
                return BookStatus::PreorderClosed;
            }
            return BookStatus::Preorder;
        }
        let available = self.available();
        if available <= 0 {
            BookStatus::BackOrdered
        } else if available <= LOW_STOCK_THRESHOLD {
            BookStatus::LowStock
        } else {
            BookStatus::InStock
        }
    }
}

/// Stock availability summary for a single book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub available: bool,
    pub in_stock: i64,
    pub reserved: i64,
}
