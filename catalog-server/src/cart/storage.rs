//! redb-based storage for local storefront state
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `prefs` | fixed string key | JSON bytes | Cart contents and theme |
//!
//! Two fixed keys are used: [`CART_KEY`] for the cart line items and
//! [`THEME_KEY`] for the color theme. The keys are part of the on-disk
//! format carried over from earlier releases and must not change, or
//! existing carts are silently lost.

use redb::{Database, ReadableDatabase, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Single preference table: key = preference name, value = JSON bytes
const PREFS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("prefs");

/// Fixed key for persisted cart items
pub const CART_KEY: &str = "cv_cart";

/// Fixed key for the persisted color theme
pub const THEME_KEY: &str = "cv_theme";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Preference storage backed by redb
#[derive(Clone)]
pub struct PrefStorage {
    db: Arc<Database>,
}

impl PrefStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;

        // Initialize the table
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PREFS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PREFS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Store a value under a preference key
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let bytes = serde_json::to_vec(value)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PREFS_TABLE)?;
            table.insert(key, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Load a value by preference key
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PREFS_TABLE)?;
        match table.get(key)? {
            Some(value) => {
                let parsed = serde_json::from_slice(value.value())?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Remove a preference key
    pub fn remove(&self, key: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PREFS_TABLE)?;
            table.remove(key)?;
        }
        txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::CartItem;

    fn item(book_id: &str) -> CartItem {
        CartItem {
            book_id: book_id.to_string(),
            title: "Dune".to_string(),
            price: Decimal::new(1799, 2),
            cover: "/images/covers/dune.jpg".to_string(),
        }
    }

    #[test]
    fn test_cart_round_trip() {
        let storage = PrefStorage::open_in_memory().unwrap();

        // Nothing persisted yet
        let empty: Option<Vec<CartItem>> = storage.get(CART_KEY).unwrap();
        assert!(empty.is_none());

        let items = vec![item("book-1"), item("book-2")];
        storage.put(CART_KEY, &items).unwrap();

        let loaded: Vec<CartItem> = storage.get(CART_KEY).unwrap().unwrap();
        assert_eq!(loaded, items);
    }

    #[test]
    fn test_theme_round_trip() {
        let storage = PrefStorage::open_in_memory().unwrap();
        storage.put(THEME_KEY, &"light").unwrap();
        let theme: String = storage.get(THEME_KEY).unwrap().unwrap();
        assert_eq!(theme, "light");
    }

    #[test]
    fn test_remove_clears_key() {
        let storage = PrefStorage::open_in_memory().unwrap();
        storage.put(CART_KEY, &vec![item("book-1")]).unwrap();
        storage.remove(CART_KEY).unwrap();
        let loaded: Option<Vec<CartItem>> = storage.get(CART_KEY).unwrap();
        assert!(loaded.is_none());
    }
}
