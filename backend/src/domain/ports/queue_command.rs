//! Driving port for turn-queue mutations.
//!
//! Every call runs as one transaction: the queue either reflects the whole
//! change or none of it. Calls are not idempotent, so callers must re-read
//! the queue before retrying an ambiguous failure.

use async_trait::async_trait;

use crate::domain::{Error, MemberId, QueueEntry};

/// Driving port for reordering the turn queue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueCommand: Send + Sync {
    /// Append a member to the back of the queue.
    ///
    /// Returns `false` when the member was already queued.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the member is unknown.
    async fn add_member_to_queue(&self, member: MemberId) -> Result<bool, Error>;

    /// Remove a member and close the gap behind them.
    ///
    /// # Errors
    ///
    /// Returns `NotInQueue` if the member holds no slot.
    async fn remove_member_from_queue(&self, member: MemberId) -> Result<QueueEntry, Error>;

    /// Move a member to `position`, returning the new order.
    ///
    /// # Errors
    ///
    /// Returns `NotInQueue` or `OutOfRange`.
    async fn move_member_to_position(
        &self,
        member: MemberId,
        position: usize,
    ) -> Result<Vec<QueueEntry>, Error>;

    /// Advance the turn by one, returning the new order.
    async fn rotate_queue(&self) -> Result<Vec<QueueEntry>, Error>;

    /// Advance the turn by `positions` (negative rotates backwards).
    async fn rotate_queue_by_positions(&self, positions: i64) -> Result<Vec<QueueEntry>, Error>;

    /// Rotate until `member` holds the turn, returning the new order.
    ///
    /// # Errors
    ///
    /// Returns `NotInQueue` if the member holds no slot.
    async fn rotate_to_member(&self, member: MemberId) -> Result<Vec<QueueEntry>, Error>;
}
