//! Books and their lifecycle status.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Error, MemberId};

/// Stable book identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(u64);

impl BookId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a book sits in the reading lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookStatus {
    /// Proposed by its owner, not yet scheduled.
    Wishlist,
    /// Queued to become the current book.
    Next,
    /// Being read by the club.
    Current,
    /// Finished.
    Completed,
}

impl BookStatus {
    /// Upper-case label used in snapshots and terminal output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wishlist => "WISHLIST",
            Self::Next => "NEXT",
            Self::Current => "CURRENT",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A book proposed by a member.
///
/// ## Invariants
/// - `completion_date` is set only while the status is
///   [`BookStatus::Completed`].
/// - The status changes only through the lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    owner_id: MemberId,
    status: BookStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completion_date: Option<NaiveDate>,
}

impl Book {
    /// Create a wishlist book. Title and author are trimmed and required.
    pub fn try_new(id: BookId, owner_id: MemberId, title: &str, author: &str) -> Result<Self, Error> {
        let title = title.trim();
        let author = author.trim();
        if title.is_empty() {
            return Err(Error::invalid_request("book title must not be empty"));
        }
        if author.is_empty() {
            return Err(Error::invalid_request("book author must not be empty"));
        }
        Ok(Self {
            id,
            title: title.to_owned(),
            author: author.to_owned(),
            owner_id,
            status: BookStatus::Wishlist,
            completion_date: None,
        })
    }

    /// Book identifier.
    pub fn id(&self) -> BookId {
        self.id
    }

    /// Title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Author.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Member who proposed the book.
    pub fn owner_id(&self) -> MemberId {
        self.owner_id
    }

    /// Lifecycle status.
    pub fn status(&self) -> BookStatus {
        self.status
    }

    /// Date the book was completed.
    pub fn completion_date(&self) -> Option<NaiveDate> {
        self.completion_date
    }

    /// Whether `completion_date` agrees with the status.
    pub(crate) fn completion_date_consistent(&self) -> bool {
        self.completion_date.is_none() || self.status == BookStatus::Completed
    }

    /// Move to a non-completed status, clearing any completion date.
    pub(crate) fn transition(&mut self, status: BookStatus) {
        self.status = status;
        if status != BookStatus::Completed {
            self.completion_date = None;
        }
    }

    pub(crate) fn complete(&mut self, on: NaiveDate) {
        self.status = BookStatus::Completed;
        self.completion_date = Some(on);
    }
}
