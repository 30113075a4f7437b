//! Integration tests for the SQL-backed catalog
//!
//! Runs the real migrations against a temporary SQLite file and checks
//! that the repositories behave exactly like the reference in-memory
//! backend: same predicate, same orderings, same aggregates.

use std::sync::Arc;

use catalog_server::catalog::{BookService, CatalogStore, SalesHistory, StoreOrder};
use catalog_server::db::DbService;
use catalog_server::db::repository::{BookRepository, OrderLineRepository};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use shared::models::{Book, BookStatus};
use shared::query::{BookQuery, SortKey};

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

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

async fn open_repos(dir: &tempfile::TempDir) -> (BookRepository, OrderLineRepository) {
    let path = dir.path().join("catalog.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    (
        BookRepository::new(db.pool.clone()),
        OrderLineRepository::new(db.pool),
    )
}

#[tokio::test]
async fn test_filter_pushdown_matches_predicate() {
    let dir = tempfile::tempdir().unwrap();
    let (books, _) = open_repos(&dir).await;
    let now = at(2025, 6, 1);

    let mut gatsby = book("gatsby", "The Great Gatsby", "F. Scott Fitzgerald", 1099);
    gatsby.genre = "Classic".to_string();
    let mut dune = book("dune", "Dune", "Frank Herbert", 1799);
    dune.genre = "Sci-Fi".to_string();
    dune.format = "Hardcover".to_string();
    let mut sold_out = book("soldout", "Gone", "Nobody", 999);
    sold_out.inventory_count = 2;
    sold_out.reserved_count = 2;

    for b in [&gatsby, &dune, &sold_out] {
        books.upsert(b).await.unwrap();
    }

    // Genre filter
    let query = BookQuery::all().in_genre("Sci-Fi");
    let fetched = books
        .fetch(&query, StoreOrder::Title, None, now)
        .await
        .unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, "dune");
    assert_eq!(books.count(&query, now).await.unwrap(), 1);

    // "All" genre is not a constraint
    let query = BookQuery::all().in_genre("All");
    assert_eq!(books.count(&query, now).await.unwrap(), 3);

    // In-stock uses available, not raw inventory
    let query = BookQuery::all().in_stock();
    let fetched = books
        .fetch(&query, StoreOrder::Title, None, now)
        .await
        .unwrap();
    assert!(fetched.iter().all(|b| b.id != "soldout"));
    assert_eq!(books.count(&query, now).await.unwrap(), 2);

    // Search hits author case-insensitively
    let query = BookQuery::all().matching("herbert");
    assert_eq!(books.count(&query, now).await.unwrap(), 1);

    // Inclusive price bounds
    let query = BookQuery::all().priced(
        Some(Decimal::new(1099, 2)),
        Some(Decimal::new(1799, 2)),
    );
    assert_eq!(books.count(&query, now).await.unwrap(), 2);
}

#[tokio::test]
async fn test_expired_limited_preorder_excluded_in_sql() {
    let dir = tempfile::tempdir().unwrap();
    let (books, _) = open_repos(&dir).await;
    let now = at(2025, 6, 1);

    let mut expired = book("expired", "Collector's Cut", "A", 4999);
    expired.is_preorder = true;
    expired.is_limited_preorder = true;
    expired.preorder_cutoff_date = Some(at(2025, 5, 1));
    expired.publication_date = NaiveDate::from_ymd_opt(2025, 5, 15);

    let mut open_window = book("open", "Upcoming Special", "B", 3999);
    open_window.is_preorder = true;
    open_window.is_limited_preorder = true;
    open_window.preorder_cutoff_date = Some(at(2025, 7, 1));

    // Window closed but the edition is not out yet: stays listed
    let mut unreleased = book("unreleased", "Waiting Room", "C", 2999);
    unreleased.is_preorder = true;
    unreleased.is_limited_preorder = true;
    unreleased.preorder_cutoff_date = Some(at(2025, 5, 1));
    unreleased.publication_date = NaiveDate::from_ymd_opt(2025, 9, 1);

    books.upsert(&expired).await.unwrap();
    books.upsert(&open_window).await.unwrap();
    books.upsert(&unreleased).await.unwrap();

    let query = BookQuery::all().preorders();
    let fetched = books
        .fetch(&query, StoreOrder::Title, None, now)
        .await
        .unwrap();
    let ids: Vec<&str> = fetched.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["open", "unreleased"]);
    assert_eq!(books.count(&query, now).await.unwrap(), 2);

    // Direct lookup still reaches the expired one
    let direct = books.find_by_id("expired").await.unwrap().unwrap();
    assert_eq!(direct.status(now), BookStatus::PreorderClosed);
}

#[tokio::test]
async fn test_order_and_pagination_pushdown() {
    let dir = tempfile::tempdir().unwrap();
    let (books, _) = open_repos(&dir).await;
    let now = at(2025, 6, 1);

    let mut b1 = book("b1", "Beta", "A", 3000);
    b1.publication_date = NaiveDate::from_ymd_opt(2020, 1, 1);
    let mut b2 = book("b2", "alpha", "B", 1000);
    b2.publication_date = NaiveDate::from_ymd_opt(2024, 1, 1);
    let b3 = book("b3", "Gamma", "C", 2000); // no publication date

    for b in [&b1, &b2, &b3] {
        books.upsert(b).await.unwrap();
    }

    // Title order is case-insensitive
    let fetched = books
        .fetch(&BookQuery::all(), StoreOrder::Title, None, now)
        .await
        .unwrap();
    let ids: Vec<&str> = fetched.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["b2", "b1", "b3"]);

    // Newest puts undated rows last
    let fetched = books
        .fetch(&BookQuery::all(), StoreOrder::Newest, None, now)
        .await
        .unwrap();
    let ids: Vec<&str> = fetched.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["b2", "b1", "b3"]);

    // Price ascending with LIMIT/OFFSET window
    let bounds = catalog_server::catalog::PageBounds { offset: 1, limit: 1 };
    let fetched = books
        .fetch(&BookQuery::all(), StoreOrder::PriceAsc, Some(bounds), now)
        .await
        .unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, "b3");
}

#[tokio::test]
async fn test_price_ties_break_by_title_in_sql() {
    let dir = tempfile::tempdir().unwrap();
    let (books, _) = open_repos(&dir).await;
    let now = at(2025, 6, 1);

    // Id order would put Zebra first; the title tiebreak must win
    books.upsert(&book("a", "Zebra", "X", 1500)).await.unwrap();
    books.upsert(&book("b", "Apple", "Y", 1500)).await.unwrap();

    for order in [StoreOrder::PriceAsc, StoreOrder::PriceDesc] {
        let fetched = books
            .fetch(&BookQuery::all(), order, None, now)
            .await
            .unwrap();
        let titles: Vec<&str> = fetched.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "Zebra"]);
    }
}

#[tokio::test]
async fn test_sales_aggregates_exclude_bulk() {
    let dir = tempfile::tempdir().unwrap();
    let (_, orders) = open_repos(&dir).await;

    let recent = at(2025, 5, 20);
    let old = at(2023, 2, 1);
    orders
        .record_order("o1", old, &[("isbn-a".to_string(), 3)])
        .await
        .unwrap();
    orders
        .record_order(
            "o2",
            recent,
            &[("isbn-a".to_string(), 2), ("isbn-b".to_string(), 1)],
        )
        .await
        .unwrap();
    // Bulk line: invisible to both aggregates
    orders
        .record_order("o3", at(2025, 5, 25), &[("isbn-a".to_string(), 25)])
        .await
        .unwrap();

    let totals = orders.non_bulk_totals().await.unwrap();
    assert_eq!(totals.get("isbn-a"), Some(&5));
    assert_eq!(totals.get("isbn-b"), Some(&1));

    let last = orders.last_qualifying_sales().await.unwrap();
    assert_eq!(last.get("isbn-a"), Some(&recent));

    assert_eq!(orders.line_count().await.unwrap(), 4);
}

#[tokio::test]
async fn test_service_over_sql_suppresses_stale_hardcovers() {
    let dir = tempfile::tempdir().unwrap();
    let (books, orders) = open_repos(&dir).await;
    let now = at(2025, 6, 1);

    let mut stale = book("stale", "Forgotten Tome", "A", 2500);
    stale.format = "Hardcover".to_string();
    stale.inventory_count = 0;
    let mut fresh = book("fresh", "Recent Hit", "B", 2500);
    fresh.format = "Hardcover".to_string();
    fresh.inventory_count = 0;
    let shelf = book("shelf", "On the Shelf", "C", 1500);

    for b in [&stale, &fresh, &shelf] {
        books.upsert(b).await.unwrap();
    }
    orders
        .record_order("o-old", now - Duration::days(700), &[("isbn-stale".to_string(), 2)])
        .await
        .unwrap();
    orders
        .record_order("o-new", now - Duration::days(30), &[("isbn-fresh".to_string(), 2)])
        .await
        .unwrap();

    let service = BookService::new(Arc::new(books), Arc::new(orders));

    let query = BookQuery::all().without_stale_hardcovers();
    let page = service.list_at(&query, now).await;
    let ids: Vec<&str> = page.data.iter().map(|b| b.id.as_str()).collect();
    assert!(!ids.contains(&"stale"));
    assert!(ids.contains(&"fresh"));
    assert!(ids.contains(&"shelf"));
    assert_eq!(page.total, 2);
    assert_eq!(service.count_at(&query, now).await, 2);

    // Best-selling order over the same data
    let page = service
        .list_at(&BookQuery::all().order_by(SortKey::BestSelling), now)
        .await;
    assert_eq!(page.data.len(), 3);
}

#[tokio::test]
async fn test_find_by_isbn_and_sparse_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (books, _) = open_repos(&dir).await;

    let hail_mary = book("phm", "Project Hail Mary", "Andy Weir", 1899);
    books.upsert(&hail_mary).await.unwrap();

    let found = books.find_by_isbn("isbn-phm").await.unwrap().unwrap();
    assert_eq!(found.id, "phm");
    assert_eq!(found.price, Decimal::new(1899, 2));

    assert!(books.find_by_isbn("missing").await.unwrap().is_none());
    assert!(books.find_by_id("missing").await.unwrap().is_none());
}
