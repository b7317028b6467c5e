//! Driving port for book lifecycle transitions.
//!
//! These operations move books between WISHLIST, NEXT, CURRENT and
//! COMPLETED and adjust the turn queue where a transition calls for it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Actor, Book, BookId, CompletionOutcome, Error, MemberId, SkipOutcome};

/// Books involved in an emergency replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementOutcome {
    /// The former CURRENT book, back on the wishlist.
    pub previous: Book,
    /// The new CURRENT book.
    pub current: Book,
}

/// Driving port for lifecycle transitions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LifecycleCommand: Send + Sync {
    /// Make `book` the NEXT book, demoting any previous NEXT book.
    async fn set_next_book(&self, book: BookId) -> Result<Book, Error>;

    /// Promote the NEXT book when no book is CURRENT.
    ///
    /// Returns the promoted book; `None` means nothing changed.
    async fn promote_next_book_if_needed(&self) -> Result<Option<Book>, Error>;

    /// Complete the CURRENT book without checking who asked.
    ///
    /// Callers that act on behalf of a member should use
    /// [`LifecycleCommand::complete_current_book_as`].
    async fn complete_current_book(&self) -> Result<CompletionOutcome, Error>;

    /// Complete the CURRENT book after checking `actor` against the
    /// completion gate.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` when a member has not read the book and
    /// `QuorumNotMet` when too few members have.
    async fn complete_current_book_as(&self, actor: Actor) -> Result<CompletionOutcome, Error>;

    /// Swap the CURRENT book for `book` without advancing the turn.
    async fn replace_current_book(&self, book: BookId) -> Result<ReplacementOutcome, Error>;

    /// Drop the CURRENT book and move its turn holder after `place_after`.
    async fn skip_current_book(&self, place_after: MemberId) -> Result<SkipOutcome, Error>;

    /// Drop the CURRENT book of an owner who is no longer active.
    ///
    /// # Errors
    ///
    /// Returns `OwnerStillActive` if the owner is active.
    async fn skip_inactive_current_book(&self) -> Result<SkipOutcome, Error>;
}
