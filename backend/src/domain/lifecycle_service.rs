//! Book lifecycle domain service.
//!
//! Implements the lifecycle driving ports. Each command runs the
//! [`TurnCoordinator`] inside one unit of work so book status and queue
//! order commit together.

use async_trait::async_trait;

use crate::domain::ports::{
    ClubStateRepository, LifecycleCommand, LifecycleQuery, ReplacementOutcome,
};
use crate::domain::{
    Actor, Book, BookId, ClubUnitOfWork, CompletionOutcome, Error, MemberId, SkipOutcome,
    TurnCoordinator, WishlistCandidate, check_completion_gate, next_member_with_wishlist_books,
    recently_completed,
};

/// Lifecycle service implementing [`LifecycleCommand`] and
/// [`LifecycleQuery`].
#[derive(Clone)]
pub struct LifecycleService<R> {
    unit_of_work: ClubUnitOfWork<R>,
}

impl<R> LifecycleService<R> {
    /// Create a lifecycle service over a shared unit of work.
    pub fn new(unit_of_work: ClubUnitOfWork<R>) -> Self {
        Self { unit_of_work }
    }
}

#[async_trait]
impl<R> LifecycleCommand for LifecycleService<R>
where
    R: ClubStateRepository,
{
    async fn set_next_book(&self, book: BookId) -> Result<Book, Error> {
        self.unit_of_work
            .write(move |state, _| TurnCoordinator::new(state).set_next_book(book))
            .await
    }

    async fn promote_next_book_if_needed(&self) -> Result<Option<Book>, Error> {
        self.unit_of_work
            .write(|state, _| TurnCoordinator::new(state).promote_next_book_if_needed())
            .await
    }

    async fn complete_current_book(&self) -> Result<CompletionOutcome, Error> {
        self.unit_of_work
            .write(|state, today| TurnCoordinator::new(state).complete_current_book(today))
            .await
    }

    async fn complete_current_book_as(&self, actor: Actor) -> Result<CompletionOutcome, Error> {
        self.unit_of_work
            .write(move |state, today| {
                check_completion_gate(state, actor)?;
                TurnCoordinator::new(state).complete_current_book(today)
            })
            .await
    }

    async fn replace_current_book(&self, book: BookId) -> Result<ReplacementOutcome, Error> {
        self.unit_of_work
            .write(move |state, _| {
                let (previous, current) = TurnCoordinator::new(state).replace_current_book(book)?;
                Ok(ReplacementOutcome { previous, current })
            })
            .await
    }

    async fn skip_current_book(&self, place_after: MemberId) -> Result<SkipOutcome, Error> {
        self.unit_of_work
            .write(move |state, _| TurnCoordinator::new(state).skip_current_book(place_after))
            .await
    }

    async fn skip_inactive_current_book(&self) -> Result<SkipOutcome, Error> {
        self.unit_of_work
            .write(|state, _| TurnCoordinator::new(state).skip_inactive_current_book())
            .await
    }
}

#[async_trait]
impl<R> LifecycleQuery for LifecycleService<R>
where
    R: ClubStateRepository,
{
    async fn current_book(&self) -> Result<Option<Book>, Error> {
        self.unit_of_work
            .read(|state| Ok(state.shelf().current().cloned()))
            .await
    }

    async fn next_book(&self) -> Result<Option<Book>, Error> {
        self.unit_of_work
            .read(|state| Ok(state.shelf().next().cloned()))
            .await
    }

    async fn next_member_with_wishlist_books(&self) -> Result<Option<WishlistCandidate>, Error> {
        self.unit_of_work
            .read(|state| Ok(next_member_with_wishlist_books(state, state.shelf().current())))
            .await
    }

    async fn recently_completed(&self, limit: usize) -> Result<Vec<Book>, Error> {
        self.unit_of_work
            .read(move |state| Ok(recently_completed(state.shelf(), limit)))
            .await
    }
}

#[cfg(test)]
#[path = "lifecycle_service_tests.rs"]
mod tests;
