//! Domain models shared across the storefront

pub mod book;
pub mod cart;
pub mod order_line;

pub use book::{Availability, Book, BookStatus, Review};
pub use cart::CartItem;
pub use order_line::{BULK_LINE_THRESHOLD, OrderLine};
