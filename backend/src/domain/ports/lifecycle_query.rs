//! Driving port for reading book lifecycle state.

use async_trait::async_trait;

use crate::domain::{Book, Error, WishlistCandidate};

/// Driving port for lifecycle reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LifecycleQuery: Send + Sync {
    /// The CURRENT book, if any.
    async fn current_book(&self) -> Result<Option<Book>, Error>;

    /// The NEXT book, if any.
    async fn next_book(&self) -> Result<Option<Book>, Error>;

    /// The first queued member, after the active turn holder, who owns
    /// WISHLIST books.
    async fn next_member_with_wishlist_books(&self) -> Result<Option<WishlistCandidate>, Error>;

    /// Up to `limit` COMPLETED books, most recent first.
    async fn recently_completed(&self, limit: usize) -> Result<Vec<Book>, Error>;
}
