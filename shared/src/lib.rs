//! Shared types for the Chapter & Verse storefront
//!
//! Domain models, query/request types, error types and response
//! structures used across the catalog server and its clients.

pub mod error;
pub mod models;
pub mod query;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use query::{BookQuery, PaginatedResponse, SortKey};
