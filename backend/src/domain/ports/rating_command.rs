//! Driving port for member ratings.

use async_trait::async_trait;

use crate::domain::{BookId, Error, MemberId, Rating, RatingInput};

/// Driving port for recording and retracting ratings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingCommand: Send + Sync {
    /// Create or replace the rating `member` gives `book`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids and `InvalidRequest` for an
    /// over-long comment.
    async fn rate_book(
        &self,
        book: BookId,
        member: MemberId,
        input: RatingInput,
    ) -> Result<Rating, Error>;

    /// Delete the rating `member` gave `book`, returning it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such rating exists.
    async fn delete_rating(&self, book: BookId, member: MemberId) -> Result<Rating, Error>;
}
