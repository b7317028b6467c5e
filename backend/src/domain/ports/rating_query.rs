//! Driving port for reading ratings back.

use async_trait::async_trait;

use crate::domain::{BookId, Error, MemberId, Rating, RatingAverages};

/// Driving port for rating lookups and averages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingQuery: Send + Sync {
    /// Ratings of `book`, ordered by member id.
    async fn ratings_for_book(&self, book: BookId) -> Result<Vec<Rating>, Error>;

    /// Ratings given by `member`, ordered by book id.
    async fn ratings_by_member(&self, member: MemberId) -> Result<Vec<Rating>, Error>;

    /// Mean scores for `book`; zero when nobody rated it.
    async fn average_ratings(&self, book: BookId) -> Result<RatingAverages, Error>;

    /// Mean scores for each of `books`, in the order given.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if any id is unknown.
    async fn average_ratings_for_books(
        &self,
        books: Vec<BookId>,
    ) -> Result<Vec<RatingAverages>, Error>;
}
