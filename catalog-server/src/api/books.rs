//! Book API
//!
//! Listing queries arrive as camelCase query parameters and are mapped
//! onto [`BookQuery`]. Listings never fail the request; the service
//! degrades to an empty page when the catalog is unreachable.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{Availability, Book, BookStatus};
use shared::query::{BookQuery, PaginatedResponse, SortKey};
use shared::{AppError, AppResult};

use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/books", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(list))
        .route("/count", get(count))
        .route("/search", get(search))
        .route("/staff-picks", get(staff_picks))
        .route("/isbn/{isbn}", get(get_by_isbn))
        .route("/{id}", get(get_by_id))
        .route("/{id}/availability", get(availability))
}

/// A book plus its status derived at response time
#[derive(Debug, Serialize)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    pub status: BookStatus,
}

impl BookView {
    fn now(book: Book) -> Self {
        let status = book.status(Utc::now());
        Self { book, status }
    }
}

/// Listing query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub format: Option<String>,
    pub in_stock_only: bool,
    pub staff_picks_only: bool,
    pub preorder_only: bool,
    pub search: Option<String>,
    pub sort_by: SortKey,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub hide_stale_hardcovers: bool,
    pub offset: u64,
    pub limit: Option<u64>,
}

impl From<ListParams> for BookQuery {
    fn from(params: ListParams) -> Self {
        BookQuery {
            category: params.category,
            genre: params.genre,
            format: params.format,
            in_stock_only: params.in_stock_only,
            staff_picks_only: params.staff_picks_only,
            preorder_only: params.preorder_only,
            search: params.search,
            sort_by: params.sort_by,
            price_min: params.price_min,
            price_max: params.price_max,
            hide_stale_hardcovers: params.hide_stale_hardcovers,
            offset: params.offset,
            limit: params.limit,
        }
    }
}

/// GET /api/books - list books for a query
async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Json<PaginatedResponse<BookView>> {
    let query: BookQuery = params.into();
    let page = state.books.list(&query).await;
    Json(PaginatedResponse::new(
        page.data.into_iter().map(BookView::now).collect(),
        page.total,
        page.offset,
        page.limit,
    ))
}

#[derive(Serialize)]
struct CountResponse {
    count: u64,
}

/// GET /api/books/count - count books for a query
async fn count(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Json<CountResponse> {
    let query: BookQuery = params.into();
    Json(CountResponse {
        count: state.books.count(&query).await,
    })
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
}

/// GET /api/books/search?q= - free-text search over title and author
async fn search(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<BookView>> {
    let hits = state.books.search(&params.q).await;
    Json(hits.into_iter().map(BookView::now).collect())
}

/// Staff picks shown on the storefront landing page
const STAFF_PICKS_LIMIT: u64 = 10;

/// GET /api/books/staff-picks - current staff picks
async fn staff_picks(State(state): State<ServerState>) -> Json<Vec<BookView>> {
    let picks = state.books.staff_picks(STAFF_PICKS_LIMIT).await;
    Json(picks.into_iter().map(BookView::now).collect())
}

/// GET /api/books/:id - single book lookup
async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookView>> {
    let book = state
        .books
        .get_book(&id)
        .await
        .ok_or_else(|| AppError::book_not_found(&id))?;
    Ok(Json(BookView::now(book)))
}

/// GET /api/books/isbn/:isbn - lookup by ISBN
async fn get_by_isbn(
    State(state): State<ServerState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<BookView>> {
    let book = state
        .books
        .get_book_by_isbn(&isbn)
        .await
        .ok_or_else(|| AppError::book_not_found(&isbn))?;
    Ok(Json(BookView::now(book)))
}

/// GET /api/books/:id/availability - stock check, fails open
async fn availability(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Json<Availability> {
    Json(state.books.availability(&id).await)
}
