//! Member rating service.
//!
//! Ratings are dated with the clock's UTC date when first recorded. Rating
//! does not require a read mark; any member may rate any book on the shelf.

use async_trait::async_trait;

use crate::domain::ports::{ClubStateRepository, RatingCommand, RatingQuery};
use crate::domain::{
    BookDirectory, BookId, ClubUnitOfWork, Error, MemberDirectory, MemberId, Rating,
    RatingAverages, RatingInput,
};

/// Rating service implementing [`RatingCommand`] and [`RatingQuery`].
#[derive(Clone)]
pub struct RatingService<R> {
    unit_of_work: ClubUnitOfWork<R>,
}

impl<R> RatingService<R> {
    /// Create a rating service over a shared unit of work.
    pub fn new(unit_of_work: ClubUnitOfWork<R>) -> Self {
        Self { unit_of_work }
    }
}

#[async_trait]
impl<R> RatingCommand for RatingService<R>
where
    R: ClubStateRepository,
{
    async fn rate_book(
        &self,
        book: BookId,
        member: MemberId,
        input: RatingInput,
    ) -> Result<Rating, Error> {
        self.unit_of_work
            .write(move |state, today| {
                state.shelf().find_book(book)?;
                state.roster().find_member(member)?;
                state.ratings.upsert(book, member, input, today)
            })
            .await
    }

    async fn delete_rating(&self, book: BookId, member: MemberId) -> Result<Rating, Error> {
        self.unit_of_work
            .write(move |state, _| state.ratings.remove(book, member))
            .await
    }
}

#[async_trait]
impl<R> RatingQuery for RatingService<R>
where
    R: ClubStateRepository,
{
    async fn ratings_for_book(&self, book: BookId) -> Result<Vec<Rating>, Error> {
        self.unit_of_work
            .read(move |state| {
                state.shelf().find_book(book)?;
                Ok(state.ratings().for_book(book))
            })
            .await
    }

    async fn ratings_by_member(&self, member: MemberId) -> Result<Vec<Rating>, Error> {
        self.unit_of_work
            .read(move |state| {
                state.roster().find_member(member)?;
                Ok(state.ratings().by_member(member))
            })
            .await
    }

    async fn average_ratings(&self, book: BookId) -> Result<RatingAverages, Error> {
        self.unit_of_work
            .read(move |state| {
                state.shelf().find_book(book)?;
                Ok(state.ratings().averages(book))
            })
            .await
    }

    async fn average_ratings_for_books(
        &self,
        books: Vec<BookId>,
    ) -> Result<Vec<RatingAverages>, Error> {
        self.unit_of_work
            .read(move |state| {
                books
                    .iter()
                    .map(|&book| {
                        state.shelf().find_book(book)?;
                        Ok(state.ratings().averages(book))
                    })
                    .collect()
            })
            .await
    }
}
