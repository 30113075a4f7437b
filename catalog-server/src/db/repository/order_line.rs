//! Order Line Repository
//!
//! Aggregates historical order lines into the two demand signals the
//! catalog consumes. Lines above the bulk threshold are excluded in
//! SQL so institutional orders never influence ranking or staleness.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::BULK_LINE_THRESHOLD;
use sqlx::SqlitePool;
use std::collections::HashMap;

use super::RepoResult;
use crate::catalog::SalesHistory;
use crate::db::rows::{LastSaleRow, SalesTotalRow};

#[derive(Clone)]
pub struct OrderLineRepository {
    pool: SqlitePool,
}

impl OrderLineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record one historical order with its line items
    pub async fn record_order(
        &self,
        order_id: &str,
        created_at: DateTime<Utc>,
        lines: &[(String, i64)],
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("INSERT OR REPLACE INTO orders (id, created_at) VALUES (?, ?)")
            .bind(order_id)
            .bind(created_at.timestamp_millis())
            .execute(&mut *tx)
            .await?;
        for (isbn, quantity) in lines {
            sqlx::query("INSERT INTO order_items (order_id, isbn, quantity) VALUES (?, ?, ?)")
                .bind(order_id)
                .bind(isbn)
                .bind(quantity)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Total sales rows in the history, bulk included
    pub async fn line_count(&self) -> RepoResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl SalesHistory for OrderLineRepository {
    async fn non_bulk_totals(&self) -> RepoResult<HashMap<String, i64>> {
        let rows: Vec<SalesTotalRow> = sqlx::query_as(
            "SELECT isbn, SUM(quantity) AS total_quantity \
             FROM order_items WHERE quantity <= ? GROUP BY isbn",
        )
        .bind(BULK_LINE_THRESHOLD)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| (r.isbn, r.total_quantity))
            .collect())
    }

    async fn last_qualifying_sales(&self) -> RepoResult<HashMap<String, DateTime<Utc>>> {
        let rows: Vec<LastSaleRow> = sqlx::query_as(
            "SELECT oi.isbn AS isbn, MAX(o.created_at) AS last_sold_at \
             FROM order_items oi JOIN orders o ON o.id = oi.order_id \
             WHERE oi.quantity <= ? GROUP BY oi.isbn",
        )
        .bind(BULK_LINE_THRESHOLD)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| {
                // Out-of-range millis degrade to the epoch, i.e. "long ago"
                let at = DateTime::<Utc>::from_timestamp_millis(r.last_sold_at)
                    .unwrap_or_default();
                (r.isbn, at)
            })
            .collect())
    }
}
