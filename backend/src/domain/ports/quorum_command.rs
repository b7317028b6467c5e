//! Driving port for read-completion records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{BookId, CompletionRecord, Error, MemberId};

/// Effect of marking a completed book as read by every active member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillReport {
    /// The book.
    pub book_id: BookId,
    /// Records created.
    pub added: usize,
    /// Records for the book after the backfill.
    pub read_count: usize,
    /// Whether the book meets the all-but-one threshold.
    pub meets_all_but_one: bool,
}

/// Driving port for marking books read.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuorumCommand: Send + Sync {
    /// Record that `member` finished `book` today.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRead` if the record exists and `NotFound` for
    /// unknown ids.
    async fn mark_read(&self, book: BookId, member: MemberId) -> Result<CompletionRecord, Error>;

    /// Retract a read mark.
    ///
    /// # Errors
    ///
    /// Returns `NotRead` if no record exists.
    async fn unmark_read(&self, book: BookId, member: MemberId)
    -> Result<CompletionRecord, Error>;

    /// Mark every COMPLETED book as read by every active member.
    async fn backfill_completed_books(&self) -> Result<Vec<BackfillReport>, Error>;

    /// Mark one COMPLETED book as read by every active member.
    ///
    /// Returns `None`, changing nothing, when the book is not COMPLETED.
    async fn mark_book_read_by_all_active(
        &self,
        book: BookId,
    ) -> Result<Option<BackfillReport>, Error>;
}
