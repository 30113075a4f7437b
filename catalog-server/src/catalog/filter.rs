//! Query predicate shared by every catalog backend
//!
//! The SQL backend translates the same rules into a WHERE clause; this
//! module is the reference implementation and what the in-memory
//! backend runs directly. Keeping the two aligned is what makes
//! `count` exact for any query.

use chrono::{DateTime, Utc};
use shared::models::Book;
use shared::query::BookQuery;

/// Whether a limited preorder has run its course: the order window has
/// closed and the edition has been released
///
/// Such books are removed from every listing regardless of query flags;
/// they remain reachable by direct id/ISBN lookup. A closed window on
/// an unreleased edition still lists, shown as preorder-closed.
pub fn is_expired_limited_preorder(book: &Book, now: DateTime<Utc>) -> bool {
    book.is_preorder
        && book.is_limited_preorder
        && book
            .preorder_cutoff_date
            .is_some_and(|cutoff| now > cutoff)
        && book
            .publication_date
            .is_some_and(|released| released <= now.date_naive())
}

/// Whether a book matches the query filters at the given instant
pub fn matches(book: &Book, query: &BookQuery, now: DateTime<Utc>) -> bool {
    if is_expired_limited_preorder(book, now) {
        return false;
    }
    if let Some(category) = query.category_filter()
        && book.category != category
    {
        return false;
    }
    if let Some(genre) = query.genre_filter()
        && book.genre != genre
    {
        return false;
    }
    if let Some(format) = query.format_filter()
        && book.format != format
    {
        return false;
    }
    if query.in_stock_only && book.available() <= 0 {
        return false;
    }
    if query.staff_picks_only && !book.is_staff_pick {
        return false;
    }
    if query.preorder_only && !book.is_preorder {
        return false;
    }
    if let Some(term) = query.search_filter() {
        let term = term.to_lowercase();
        let in_title = book.title.to_lowercase().contains(&term);
        let in_author = book.author.to_lowercase().contains(&term);
        if !in_title && !in_author {
            return false;
        }
    }
    if let Some(min) = query.price_min
        && book.price < min
    {
        return false;
    }
    if let Some(max) = query.price_max
        && book.price > max
    {
        return false;
    }
    true
}
