//! Row types mapping SQLite columns onto the domain models
//!
//! The catalog tolerates sparse records: missing cover, category, genre
//! or format fall back to storefront defaults instead of failing the row.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use shared::models::book::{DEFAULT_CATEGORY, DEFAULT_FORMAT, DEFAULT_GENRE, PLACEHOLDER_COVER};
use shared::models::{Book, Review};
use sqlx::FromRow;

/// Convert integer cents to a decimal price
pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Convert a decimal price to integer cents
pub fn decimal_to_cents(price: Decimal) -> i64 {
    (price * Decimal::ONE_HUNDRED).round().to_i64().unwrap_or(0)
}

/// One row of the `books` table
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: String,
    pub isbn: Option<String>,
    pub title: String,
    pub author: String,
    pub description: String,
    pub price_cents: i64,
    pub cover: Option<String>,
    pub category: Option<String>,
    pub genre: Option<String>,
    pub format: Option<String>,
    pub inventory_count: i64,
    pub reserved_count: i64,
    pub publication_date: Option<String>,
    pub is_preorder: bool,
    pub is_limited_preorder: bool,
    pub preorder_cutoff_date: Option<i64>,
    pub is_staff_pick: bool,
    pub staff_reviewer: Option<String>,
    pub staff_quote: Option<String>,
    pub page_count: Option<i64>,
    pub reviews: Option<String>,
}

impl BookRow {
    /// Map to the domain model, filling defaults for sparse records
    pub fn into_book(self) -> Book {
        let reviews: Vec<Review> = self
            .reviews
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();

        Book {
            id: self.id,
            isbn: self.isbn,
            title: self.title,
            author: self.author,
            description: self.description,
            price: cents_to_decimal(self.price_cents),
            cover: self.cover.unwrap_or_else(|| PLACEHOLDER_COVER.to_string()),
            category: self.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            genre: self.genre.unwrap_or_else(|| DEFAULT_GENRE.to_string()),
            format: self.format.unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
            inventory_count: self.inventory_count,
            reserved_count: self.reserved_count,
            publication_date: self
                .publication_date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            is_preorder: self.is_preorder,
            is_limited_preorder: self.is_limited_preorder,
            preorder_cutoff_date: self
                .preorder_cutoff_date
                .and_then(DateTime::<Utc>::from_timestamp_millis),
            is_staff_pick: self.is_staff_pick,
            staff_reviewer: self.staff_reviewer,
            staff_quote: self.staff_quote,
            page_count: self.page_count,
            reviews,
        }
    }
}

/// Aggregated last qualifying sale per ISBN
#[derive(Debug, Clone, FromRow)]
pub struct LastSaleRow {
    pub isbn: String,
    pub last_sold_at: i64,
}

/// Aggregated non-bulk quantity sold per ISBN
#[derive(Debug, Clone, FromRow)]
pub struct SalesTotalRow {
    pub isbn: String,
    pub total_quantity: i64,
}
