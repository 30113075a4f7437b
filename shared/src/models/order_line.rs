//! Historical order line items
//!
//! Sales history is consumed only as a demand signal: best-seller
//! ranking and the stale-hardcover check. A single line with quantity
//! above [`BULK_LINE_THRESHOLD`] is a bulk/institutional order and is
//! never counted as consumer demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quantity above which a single order line is treated as a bulk order
pub const BULK_LINE_THRESHOLD: i64 = 20;

/// One line of a historical order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// Stable product identifier (matches `Book::isbn`)
    pub isbn: String,
    pub quantity: i64,
    /// Parent order id
    pub order_id: String,
    /// Parent order creation time
    pub ordered_at: DateTime<Utc>,
}

impl OrderLine {
    /// Whether this line is a bulk order, excluded from demand signals
    pub fn is_bulk(&self) -> bool {
        self.quantity > BULK_LINE_THRESHOLD
    }
}
