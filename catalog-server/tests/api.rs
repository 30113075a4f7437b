//! HTTP API tests
//!
//! Drives the router directly with `tower::ServiceExt::oneshot`, no
//! sockets involved. State is backed by the in-memory catalog.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use catalog_server::api;
use catalog_server::cart::CartService;
use catalog_server::catalog::{BookService, MemoryCatalog, MemorySales};
use catalog_server::{Config, ServerState};
use rust_decimal::Decimal;
use serde_json::Value;
use shared::models::Book;
use tower::ServiceExt;

fn book(id: &str, title: &str, author: &str, price_cents: i64) -> Book {
    Book {
        id: id.to_string(),
        isbn: Some(format!("isbn-{id}")),
        title: title.to_string(),
        author: author.to_string(),
        description: String::new(),
        price: Decimal::new(price_cents, 2),
        cover: "/images/covers/placeholder.jpg".to_string(),
        category: "Fiction".to_string(),
        genre: "Literary".to_string(),
        format: "Paperback".to_string(),
        inventory_count: 5,
        reserved_count: 0,
        publication_date: None,
        is_preorder: false,
        is_limited_preorder: false,
        preorder_cutoff_date: None,
        is_staff_pick: false,
        staff_reviewer: None,
        staff_quote: None,
        page_count: None,
        reviews: vec![],
    }
}

fn app(books: Vec<Book>) -> Router {
    let state = ServerState {
        config: Config::with_overrides("/tmp/catalog-test", 0),
        books: Arc::new(BookService::new(
            Arc::new(MemoryCatalog::with_books(books)),
            Arc::new(MemorySales::new()),
        )),
        cart: Arc::new(CartService::new(None)),
    };
    api::router().with_state(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app(vec![]).oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_list_books_alphabetical() {
    let app = app(vec![
        book("gatsby", "The Great Gatsby", "F. Scott Fitzgerald", 1099),
        book("orwell", "1984", "George Orwell", 999),
        book("burgess", "A Clockwork Orange", "Anthony Burgess", 1299),
    ]);

    let response = app
        .oneshot(get("/api/books?sortBy=alphabetical"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec!["1984", "A Clockwork Orange", "The Great Gatsby"]
    );
    // Listing rows carry a derived status
    assert_eq!(json["data"][0]["status"], "In Stock");
}

#[tokio::test]
async fn test_list_books_with_filters_and_window() {
    let app = app(vec![
        book("a", "Alpha", "X", 500),
        book("b", "Beta", "X", 1500),
        book("c", "Gamma", "X", 2500),
    ]);

    let response = app
        .oneshot(get(
            "/api/books?priceMin=10&priceMax=30&sortBy=price-asc&offset=0&limit=1",
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    // Two books in range, window of one
    assert_eq!(json["total"], 2);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"], "b");
}

#[tokio::test]
async fn test_get_book_and_not_found() {
    let app = app(vec![book("dune", "Dune", "Frank Herbert", 1799)]);

    let response = app
        .clone()
        .oneshot(get("/api/books/dune"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Dune");

    let response = app.oneshot(get("/api/books/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], 1001);
}

#[tokio::test]
async fn test_availability_fails_open() {
    let app = app(vec![]);
    let response = app
        .oneshot(get("/api/books/unknown/availability"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["available"], true);
    assert_eq!(json["in_stock"], 10);
}

#[tokio::test]
async fn test_cart_flow() {
    let app = app(vec![book("dune", "Dune", "Frank Herbert", 1799)]);

    // Add a known book
    let request = Request::builder()
        .method("POST")
        .uri("/api/cart/items")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"book_id":"dune"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["items"][0]["title"], "Dune");

    // Adding an unknown book is rejected
    let request = Request::builder()
        .method("POST")
        .uri("/api/cart/items")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"book_id":"nope"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Removing a line that is not there reports the cart error code
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/cart/items/nope")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], 2001);
}

#[tokio::test]
async fn test_theme_round_trip() {
    let app = app(vec![]);

    let response = app.clone().oneshot(get("/api/theme")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["theme"], "dark");

    let request = Request::builder()
        .method("PUT")
        .uri("/api/theme")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"theme":"light"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["theme"], "light");
}
