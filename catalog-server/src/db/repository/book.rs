//! Book Repository
//!
//! Translates [`BookQuery`] into SQL. The WHERE clause mirrors
//! `catalog::filter::matches` exactly, including the removal of
//! limited preorders whose window has closed after release, so a
//! pushed-down COUNT agrees with any page fetched for the same query.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::Book;
use shared::query::BookQuery;
use shared::util::now_millis;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{RepoError, RepoResult};
use crate::catalog::{CatalogStore, PageBounds, StoreOrder};
use crate::db::rows::{BookRow, decimal_to_cents};

const BOOK_COLUMNS: &str = "id, isbn, title, author, description, price_cents, cover, \
     category, genre, format, inventory_count, reserved_count, publication_date, \
     is_preorder, is_limited_preorder, preorder_cutoff_date, is_staff_pick, \
     staff_reviewer, staff_quote, page_count, reviews";

#[derive(Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append the query predicate to a builder that already has a WHERE
    fn push_filters(
        builder: &mut QueryBuilder<'_, Sqlite>,
        query: &BookQuery,
        now: DateTime<Utc>,
    ) {
        // Limited preorders whose window has closed and whose edition
        // has been released never appear in listings
        builder
            .push(" AND NOT (is_preorder = 1 AND is_limited_preorder = 1")
            .push(" AND preorder_cutoff_date IS NOT NULL AND preorder_cutoff_date < ")
            .push_bind(now.timestamp_millis())
            .push(" AND publication_date IS NOT NULL AND publication_date <= ")
            .push_bind(now.date_naive().format("%Y-%m-%d").to_string())
            .push(")");

        if let Some(category) = query.category_filter() {
            builder.push(" AND category = ").push_bind(category.to_string());
        }
        if let Some(genre) = query.genre_filter() {
            builder.push(" AND genre = ").push_bind(genre.to_string());
        }
        if let Some(format) = query.format_filter() {
            builder.push(" AND format = ").push_bind(format.to_string());
        }
        if query.in_stock_only {
            builder.push(" AND (inventory_count - reserved_count) > 0");
        }
        if query.staff_picks_only {
            builder.push(" AND is_staff_pick = 1");
        }
        if query.preorder_only {
            builder.push(" AND is_preorder = 1");
        }
        if let Some(term) = query.search_filter() {
            let pattern = format!("%{term}%");
            builder
                .push(" AND (title LIKE ")
                .push_bind(pattern.clone())
                .push(" OR author LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(min) = query.price_min {
            builder
                .push(" AND price_cents >= ")
                .push_bind(decimal_to_cents(min));
        }
        if let Some(max) = query.price_max {
            builder
                .push(" AND price_cents <= ")
                .push_bind(decimal_to_cents(max));
        }
    }

    fn push_order(builder: &mut QueryBuilder<'_, Sqlite>, order: StoreOrder) {
        let clause = match order {
            StoreOrder::Title => " ORDER BY title COLLATE NOCASE ASC, id ASC",
            StoreOrder::Newest => {
                " ORDER BY publication_date IS NULL ASC, publication_date DESC, \
                 title COLLATE NOCASE ASC, id ASC"
            }
            StoreOrder::PriceAsc => {
                " ORDER BY price_cents ASC, title COLLATE NOCASE ASC, id ASC"
            }
            StoreOrder::PriceDesc => {
                " ORDER BY price_cents DESC, title COLLATE NOCASE ASC, id ASC"
            }
            StoreOrder::Unspecified => " ORDER BY id ASC",
        };
        builder.push(clause);
    }

    /// Insert or replace a catalog record
    pub async fn upsert(&self, book: &Book) -> RepoResult<()> {
        let reviews = serde_json::to_string(&book.reviews)
            .map_err(|e| RepoError::Validation(format!("Unserializable reviews: {e}")))?;
        sqlx::query(
            "INSERT OR REPLACE INTO books (id, isbn, title, author, description, price_cents, \
             cover, category, genre, format, inventory_count, reserved_count, publication_date, \
             is_preorder, is_limited_preorder, preorder_cutoff_date, is_staff_pick, \
             staff_reviewer, staff_quote, page_count, reviews, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&book.id)
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(decimal_to_cents(book.price))
        .bind(&book.cover)
        .bind(&book.category)
        .bind(&book.genre)
        .bind(&book.format)
        .bind(book.inventory_count)
        .bind(book.reserved_count)
        .bind(book.publication_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(book.is_preorder)
        .bind(book.is_limited_preorder)
        .bind(book.preorder_cutoff_date.map(|d| d.timestamp_millis()))
        .bind(book.is_staff_pick)
        .bind(&book.staff_reviewer)
        .bind(&book.staff_quote)
        .bind(book.page_count)
        .bind(reviews)
        .bind(now_millis())
        .bind(now_millis())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for BookRepository {
    async fn fetch(
        &self,
        query: &BookQuery,
        order: StoreOrder,
        bounds: Option<PageBounds>,
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<Book>> {
        let mut builder =
            QueryBuilder::new(format!("SELECT {BOOK_COLUMNS} FROM books WHERE 1=1"));
        Self::push_filters(&mut builder, query, now);
        Self::push_order(&mut builder, order);
        if let Some(bounds) = bounds {
            builder
                .push(" LIMIT ")
                .push_bind(bounds.limit as i64)
                .push(" OFFSET ")
                .push_bind(bounds.offset as i64);
        }

        let rows: Vec<BookRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(BookRow::into_book).collect())
    }

    async fn count(&self, query: &BookQuery, now: DateTime<Utc>) -> RepoResult<u64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM books WHERE 1=1");
        Self::push_filters(&mut builder, query, now);
        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Book>> {
        let row: Option<BookRow> =
            sqlx::query_as(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(BookRow::into_book))
    }

    async fn find_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>> {
        let row: Option<BookRow> = sqlx::query_as(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE isbn = ? LIMIT 1"
        ))
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(BookRow::into_book))
    }
}
