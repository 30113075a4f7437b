//! Cart Module
//!
//! Holds the shopper's cart and theme preference, persisted locally
//! through [`storage::PrefStorage`]. Persistence is best-effort: when
//! the store cannot be opened or written the cart keeps working in
//! memory for the session and only durability is lost.

pub mod storage;

pub use storage::{CART_KEY, PrefStorage, THEME_KEY};

use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::CartItem;

/// Storefront color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Cart service with local persistence
pub struct CartService {
    store: Option<PrefStorage>,
    items: Mutex<Vec<CartItem>>,
    theme: Mutex<Theme>,
}

impl CartService {
    /// Create the service, loading any persisted state
    ///
    /// `store` is `None` when the preference database failed to open;
    /// the cart then runs in memory only.
    pub fn new(store: Option<PrefStorage>) -> Self {
        let items = store
            .as_ref()
            .and_then(|s| match s.get::<Vec<CartItem>>(CART_KEY) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!("Persisted cart unreadable, starting empty: {e}");
                    None
                }
            })
            .unwrap_or_default();

        let theme = store
            .as_ref()
            .and_then(|s| match s.get::<Theme>(THEME_KEY) {
                Ok(theme) => theme,
                Err(e) => {
                    tracing::warn!("Persisted theme unreadable, using default: {e}");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            store,
            items: Mutex::new(items),
            theme: Mutex::new(theme),
        }
    }

    fn persist_items(&self, items: &[CartItem]) {
        if let Some(store) = &self.store
            && let Err(e) = store.put(CART_KEY, &items)
        {
            tracing::warn!("Failed to persist cart: {e}");
        }
    }

    /// Add a line item. The same book can be added more than once.
    pub fn add(&self, item: CartItem) {
        let mut items = self.items.lock();
        items.push(item);
        self.persist_items(&items);
    }

    /// Remove the first line item for the given book, if any
    pub fn remove(&self, book_id: &str) -> bool {
        let mut items = self.items.lock();
        match items.iter().position(|i| i.book_id == book_id) {
            Some(index) => {
                items.remove(index);
                self.persist_items(&items);
                true
            }
            None => false,
        }
    }

    pub fn items(&self) -> Vec<CartItem> {
        self.items.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Sum of line item prices
    pub fn total(&self) -> Decimal {
        self.items.lock().iter().map(|i| i.price).sum()
    }

    pub fn clear(&self) {
        let mut items = self.items.lock();
        items.clear();
        self.persist_items(&items);
    }

    pub fn theme(&self) -> Theme {
        *self.theme.lock()
    }

    pub fn set_theme(&self, theme: Theme) {
        *self.theme.lock() = theme;
        if let Some(store) = &self.store
            && let Err(e) = store.put(THEME_KEY, &theme)
        {
            tracing::warn!("Failed to persist theme: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(book_id: &str, cents: i64) -> CartItem {
        CartItem {
            book_id: book_id.to_string(),
            title: format!("Title {book_id}"),
            price: Decimal::new(cents, 2),
            cover: "/images/covers/placeholder.jpg".to_string(),
        }
    }

    #[test]
    fn test_add_remove_and_total() {
        let cart = CartService::new(None);
        cart.add(item("b1", 1000));
        cart.add(item("b2", 550));
        // Same book twice: two line items
        cart.add(item("b1", 1000));

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.total(), Decimal::new(2550, 2));

        // Remove drops only the first matching line
        assert!(cart.remove("b1"));
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total(), Decimal::new(1550, 2));

        assert!(!cart.remove("missing"));
    }

    #[test]
    fn test_clear() {
        let cart = CartService::new(None);
        cart.add(item("b1", 1000));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_theme_defaults_to_dark() {
        let cart = CartService::new(None);
        assert_eq!(cart.theme(), Theme::Dark);
        cart.set_theme(Theme::Light);
        assert_eq!(cart.theme(), Theme::Light);
    }

    #[test]
    fn test_state_survives_reopen() {
        let storage = PrefStorage::open_in_memory().unwrap();

        let cart = CartService::new(Some(storage.clone()));
        cart.add(item("b1", 1799));
        cart.set_theme(Theme::Light);
        drop(cart);

        // A new service over the same store sees the persisted state
        let reopened = CartService::new(Some(storage));
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.items()[0].book_id, "b1");
        assert_eq!(reopened.theme(), Theme::Light);
    }
}
