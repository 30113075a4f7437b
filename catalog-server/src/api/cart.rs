//! Cart API

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::models::CartItem;
use shared::{AppError, AppResult};

use crate::cart::Theme;
use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/cart", cart_routes())
        .nest("/api/theme", theme_routes())
}

fn cart_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(view).delete(clear))
        .route("/items", post(add_item))
        .route("/items/{book_id}", delete(remove_item))
}

fn theme_routes() -> Router<ServerState> {
    Router::new().route("/", get(get_theme).put(set_theme))
}

/// Cart contents with derived totals
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub count: usize,
}

impl CartView {
    fn of(state: &ServerState) -> Self {
        Self {
            items: state.cart.items(),
            total: state.cart.total(),
            count: state.cart.len(),
        }
    }
}

/// GET /api/cart - cart contents
async fn view(State(state): State<ServerState>) -> Json<CartView> {
    Json(CartView::of(&state))
}

#[derive(Debug, Deserialize)]
struct AddItemRequest {
    book_id: String,
}

/// POST /api/cart/items - add a book to the cart
///
/// The line item is a snapshot of the book at add-time.
async fn add_item(
    State(state): State<ServerState>,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<Json<CartView>> {
    let book = state
        .books
        .get_book(&payload.book_id)
        .await
        .ok_or_else(|| AppError::book_not_found(&payload.book_id))?;
    state.cart.add(CartItem::snapshot_of(&book));
    Ok(Json(CartView::of(&state)))
}

/// DELETE /api/cart/items/:book_id - remove the first matching line
async fn remove_item(
    State(state): State<ServerState>,
    Path(book_id): Path<String>,
) -> AppResult<Json<CartView>> {
    if !state.cart.remove(&book_id) {
        return Err(AppError::with_message(
            ErrorCode::CartItemNotFound,
            format!("No cart line for book {book_id}"),
        ));
    }
    Ok(Json(CartView::of(&state)))
}

/// DELETE /api/cart - empty the cart
async fn clear(State(state): State<ServerState>) -> Json<CartView> {
    state.cart.clear();
    Json(CartView::of(&state))
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemeBody {
    theme: Theme,
}

/// GET /api/theme - current color theme
async fn get_theme(State(state): State<ServerState>) -> Json<ThemeBody> {
    Json(ThemeBody {
        theme: state.cart.theme(),
    })
}

/// PUT /api/theme - switch the color theme
async fn set_theme(
    State(state): State<ServerState>,
    Json(body): Json<ThemeBody>,
) -> Json<ThemeBody> {
    state.cart.set_theme(body.theme);
    Json(ThemeBody {
        theme: state.cart.theme(),
    })
}
