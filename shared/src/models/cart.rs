//! Cart Model

use super::book::Book;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cart line item — a snapshot of a book at add-time
///
/// The cart is an ordered sequence of snapshots; adding the same book
/// twice yields two line items, not a quantity field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Book id the snapshot was taken from
    pub book_id: String,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Cover image reference
    pub cover: String,
}

impl CartItem {
    /// Snapshot a book for the cart
    pub fn snapshot_of(book: &Book) -> Self {
        Self {
            book_id: book.id.clone(),
            title: book.title.clone(),
            price: book.price,
            cover: book.cover.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_round_trip() {
        let item = CartItem {
            book_id: "book-1".to_string(),
            title: "Dune".to_string(),
            price: Decimal::new(1799, 2),
            cover: "/images/covers/dune.jpg".to_string(),
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: CartItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
