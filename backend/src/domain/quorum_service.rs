//! Read-completion domain service.
//!
//! Implements the quorum driving ports. Read marks are stamped with the
//! clock's UTC date; backfilled marks reuse the book's completion date,
//! falling back to today for books completed without one.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{
    BackfillReport, ClubStateRepository, QuorumCommand, QuorumQuery, QuorumStatus,
};
use crate::domain::{
    Book, BookDirectory, BookId, BookStatus, ClubState, ClubUnitOfWork, CompletionRecord, Error,
    MemberDirectory, MemberId, QuorumThreshold,
};

/// Quorum service implementing [`QuorumCommand`] and [`QuorumQuery`].
#[derive(Clone)]
pub struct QuorumService<R> {
    unit_of_work: ClubUnitOfWork<R>,
}

impl<R> QuorumService<R> {
    /// Create a quorum service over a shared unit of work.
    pub fn new(unit_of_work: ClubUnitOfWork<R>) -> Self {
        Self { unit_of_work }
    }
}

fn check_known(state: &ClubState, book: BookId, member: MemberId) -> Result<(), Error> {
    state.shelf().find_book(book)?;
    state.roster().find_member(member)?;
    Ok(())
}

/// Mark a COMPLETED book as read by every active member.
fn backfill(state: &mut ClubState, book: &Book, today: NaiveDate) -> BackfillReport {
    let active: Vec<MemberId> = state
        .roster
        .iter()
        .filter(|member| member.is_active())
        .map(|member| member.id())
        .collect();
    let on = book.completion_date().unwrap_or(today);
    let added = state.quorum.mark_read_by_all(book.id(), active.iter().copied(), on);
    let read_count = state.quorum.read_count(book.id());
    BackfillReport {
        book_id: book.id(),
        added,
        read_count,
        meets_all_but_one: read_count >= QuorumThreshold::AllButOne.required_readers(active.len()),
    }
}

#[async_trait]
impl<R> QuorumCommand for QuorumService<R>
where
    R: ClubStateRepository,
{
    async fn mark_read(&self, book: BookId, member: MemberId) -> Result<CompletionRecord, Error> {
        self.unit_of_work
            .write(move |state, today| {
                check_known(state, book, member)?;
                state.quorum.mark_read(book, member, today)
            })
            .await
    }

    async fn unmark_read(
        &self,
        book: BookId,
        member: MemberId,
    ) -> Result<CompletionRecord, Error> {
        self.unit_of_work
            .write(move |state, _| {
                check_known(state, book, member)?;
                state.quorum.unmark_read(book, member)
            })
            .await
    }

    async fn backfill_completed_books(&self) -> Result<Vec<BackfillReport>, Error> {
        self.unit_of_work
            .write(|state, today| {
                let completed: Vec<Book> = state
                    .shelf()
                    .with_status(BookStatus::Completed)
                    .cloned()
                    .collect();
                Ok(completed
                    .iter()
                    .map(|book| backfill(state, book, today))
                    .collect())
            })
            .await
    }

    async fn mark_book_read_by_all_active(
        &self,
        book: BookId,
    ) -> Result<Option<BackfillReport>, Error> {
        self.unit_of_work
            .write(move |state, today| {
                let book = state.shelf().find_book(book)?.clone();
                if book.status() != BookStatus::Completed {
                    return Ok(None);
                }
                Ok(Some(backfill(state, &book, today)))
            })
            .await
    }
}

#[async_trait]
impl<R> QuorumQuery for QuorumService<R>
where
    R: ClubStateRepository,
{
    async fn read_count(&self, book: BookId) -> Result<usize, Error> {
        self.unit_of_work
            .read(move |state| {
                state.shelf().find_book(book)?;
                Ok(state.quorum().read_count(book))
            })
            .await
    }

    async fn has_read(&self, book: BookId, member: MemberId) -> Result<bool, Error> {
        self.unit_of_work
            .read(move |state| {
                check_known(state, book, member)?;
                Ok(state.quorum().has_read(book, member))
            })
            .await
    }

    async fn readers(&self, book: BookId) -> Result<Vec<CompletionRecord>, Error> {
        self.unit_of_work
            .read(move |state| {
                state.shelf().find_book(book)?;
                Ok(state.quorum().readers(book))
            })
            .await
    }

    async fn is_completable(&self, book: BookId, active_members: usize) -> Result<bool, Error> {
        self.unit_of_work
            .read(move |state| {
                state.shelf().find_book(book)?;
                Ok(state.quorum().is_completable(book, active_members))
            })
            .await
    }

    async fn quorum_status(&self, book: BookId) -> Result<QuorumStatus, Error> {
        self.unit_of_work
            .read(move |state| {
                state.shelf().find_book(book)?;
                let active_members = state.roster().count_active();
                Ok(QuorumStatus {
                    book_id: book,
                    read_count: state.quorum().read_count(book),
                    active_members,
                    required_readers: QuorumThreshold::Majority.required_readers(active_members),
                    completable: state.quorum().is_completable(book, active_members),
                })
            })
            .await
    }
}
