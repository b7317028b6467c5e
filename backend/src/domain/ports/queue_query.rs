//! Driving port for reading the turn queue.

use async_trait::async_trait;

use crate::domain::{Error, QueueEntry};

/// Driving port for turn-queue reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueQuery: Send + Sync {
    /// Slots in ascending position order.
    async fn get_queue(&self) -> Result<Vec<QueueEntry>, Error>;

    /// The member whose turn it is.
    ///
    /// # Errors
    ///
    /// Returns `EmptyQueue` when nobody is queued.
    async fn get_current_member(&self) -> Result<QueueEntry, Error>;

    /// The member after the current one.
    ///
    /// # Errors
    ///
    /// Returns `NoNextMember` when fewer than two members are queued.
    async fn get_next_member(&self) -> Result<QueueEntry, Error>;
}
