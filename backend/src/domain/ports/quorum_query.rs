//! Driving port for quorum reads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{BookId, CompletionRecord, Error, MemberId};

/// Quorum standing of one book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuorumStatus {
    /// The book.
    pub book_id: BookId,
    /// Members who read it.
    pub read_count: usize,
    /// Active members right now.
    pub active_members: usize,
    /// Readers needed under the majority threshold.
    pub required_readers: usize,
    /// Whether the book may be completed.
    pub completable: bool,
}

/// Driving port for quorum reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuorumQuery: Send + Sync {
    /// Members who read `book`.
    async fn read_count(&self, book: BookId) -> Result<usize, Error>;

    /// Whether `member` read `book`.
    async fn has_read(&self, book: BookId, member: MemberId) -> Result<bool, Error>;

    /// Records for `book`, ordered by member id.
    async fn readers(&self, book: BookId) -> Result<Vec<CompletionRecord>, Error>;

    /// Whether `book` has enough readers for `active_members`.
    async fn is_completable(&self, book: BookId, active_members: usize) -> Result<bool, Error>;

    /// Quorum standing of `book` against the current active count.
    async fn quorum_status(&self, book: BookId) -> Result<QuorumStatus, Error>;
}
