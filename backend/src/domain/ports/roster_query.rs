//! Driving port for roster and shelf reads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Book, BookStatus, Error, Member, MemberId};

/// Optional filters for listing books.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookFilter {
    /// Only books in this status.
    pub status: Option<BookStatus>,
    /// Only books proposed by this member.
    pub owner: Option<MemberId>,
}

impl BookFilter {
    /// Whether `book` passes the filter.
    pub fn matches(&self, book: &Book) -> bool {
        self.status.is_none_or(|status| book.status() == status)
            && self.owner.is_none_or(|owner| book.owner_id() == owner)
    }
}

/// Driving port for roster reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterQuery: Send + Sync {
    /// Members ordered by id.
    async fn list_members(&self) -> Result<Vec<Member>, Error>;

    /// One member.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    async fn find_member(&self, member: MemberId) -> Result<Member, Error>;

    /// Books passing `filter`, ordered by id.
    async fn list_books(&self, filter: BookFilter) -> Result<Vec<Book>, Error>;
}
