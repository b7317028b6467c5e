//! Driving port for member and book registration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Book, Error, Member, MemberId};

/// Request to add a book to a member's wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    /// Proposing member.
    pub owner: MemberId,
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
}

/// Driving port for roster changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterCommand: Send + Sync {
    /// Register an active member and queue them at the back.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for a blank name and `Conflict` when the
    /// name is taken.
    async fn register_member(&self, name: String) -> Result<Member, Error>;

    /// Activate or deactivate a member, joining or leaving the queue.
    async fn set_member_active(&self, member: MemberId, active: bool) -> Result<Member, Error>;

    /// Add a WISHLIST book for an existing member.
    async fn add_book(&self, book: NewBook) -> Result<Book, Error>;
}
