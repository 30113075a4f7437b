//! API Routes
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`books`] - catalog listings, lookups and availability
//! - [`cart`] - cart contents and theme preference

pub mod books;
pub mod cart;
pub mod health;

use axum::Router;

use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(books::router())
        .merge(cart::router())
}
