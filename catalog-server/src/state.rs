//! Server State
//!
//! Holds shared references to every service. `Clone` is shallow; all
//! services live behind `Arc`.

use std::sync::Arc;

use shared::{AppError, AppResult};

use crate::cart::{CartService, PrefStorage};
use crate::catalog::BookService;
use crate::config::Config;
use crate::db::DbService;
use crate::db::repository::{BookRepository, OrderLineRepository};

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub books: Arc<BookService>,
    pub cart: Arc<CartService>,
}

impl ServerState {
    /// Initialize all services from configuration
    ///
    /// The catalog database is required; the preference store is not.
    /// When it cannot be opened the cart degrades to in-memory only.
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| AppError::internal(format!("Cannot create work dir: {e}")))?;

        let db = DbService::new(&config.database_path()).await?;
        let books = Arc::new(BookService::new(
            Arc::new(BookRepository::new(db.pool.clone())),
            Arc::new(OrderLineRepository::new(db.pool.clone())),
        ));

        let prefs = match PrefStorage::open(config.prefs_path()) {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::warn!("Preference store unavailable, cart will not persist: {e}");
                None
            }
        };
        let cart = Arc::new(CartService::new(prefs));

        Ok(Self {
            config: config.clone(),
            books,
            cart,
        })
    }
}
