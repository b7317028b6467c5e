//! Turn-order operations bound to the member directory.
//!
//! [`RotationEngine`] wraps the club's [`RotationQueue`] with identity checks
//! and maps queue failures onto domain errors that carry the operation name
//! and the identifiers involved.

use rotation::{QueueSlot, RotationError, RotationQueue};
use serde_json::json;

use super::{Error, ErrorCode, MemberDirectory, MemberId};

/// One member's slot in the turn order.
pub type QueueEntry = QueueSlot<MemberId>;

/// Mutating view over the turn queue.
pub struct RotationEngine<'a, D> {
    queue: &'a mut RotationQueue<MemberId>,
    directory: &'a D,
}

impl<'a, D: MemberDirectory> RotationEngine<'a, D> {
    /// Borrow the queue alongside the directory that vouches for members.
    pub fn new(queue: &'a mut RotationQueue<MemberId>, directory: &'a D) -> Self {
        Self { queue, directory }
    }

    /// Append a known, active member to the back of the queue.
    ///
    /// Returns `false` when the member was already queued. Inactive members
    /// are refused so the queue only ever holds active members.
    pub fn add_member(&mut self, member: MemberId) -> Result<bool, Error> {
        if !self.directory.find_member(member)?.is_active() {
            return Err(Error::invalid_request(format!(
                "member {member} is inactive; reactivate them to rejoin the queue"
            ))
            .with_details(json!({ "operation": "add_member", "memberId": member })));
        }
        Ok(self.queue.append(member))
    }

    /// Remove a member and close the gap.
    pub fn remove_member(&mut self, member: MemberId) -> Result<QueueEntry, Error> {
        self.queue
            .remove(&member)
            .map_err(|err| map_rotation_error(err, "remove_member", Some(member)))
    }

    /// Move a member to `position`, shifting the members in between.
    pub fn move_to_position(&mut self, member: MemberId, position: usize) -> Result<(), Error> {
        self.queue
            .move_to(&member, position)
            .map_err(|err| map_rotation_error(err, "move_to_position", Some(member)))
    }

    /// Advance the turn order by one.
    pub fn rotate(&mut self) -> usize {
        self.queue.rotate()
    }

    /// Advance the turn order by `positions`, normalised modulo the length.
    pub fn rotate_by(&mut self, positions: i64) -> usize {
        self.queue.rotate_by(positions)
    }

    /// Rotate until `member` holds position `0`.
    pub fn rotate_to_member(&mut self, member: MemberId) -> Result<usize, Error> {
        self.queue
            .rotate_to(&member)
            .map_err(|err| map_rotation_error(err, "rotate_to_member", Some(member)))
    }

    /// Move the current turn holder to just after `anchor`.
    ///
    /// Returns the moved member and the position it landed on.
    pub fn skip_current_member(&mut self, anchor: MemberId) -> Result<QueueEntry, Error> {
        let current = self
            .queue
            .current()
            .map_err(|err| map_rotation_error(err, "skip_current_member", None))?
            .member;
        let position = self
            .queue
            .place_after(&current, &anchor)
            .map_err(|err| map_rotation_error(err, "skip_current_member", Some(anchor)))?;
        Ok(QueueSlot::new(current, position))
    }
}

/// Slots in ascending position order.
pub fn queue_entries(queue: &RotationQueue<MemberId>) -> Vec<QueueEntry> {
    queue.slots().to_vec()
}

/// Slot at position `0`.
pub fn current_entry(queue: &RotationQueue<MemberId>) -> Result<QueueEntry, Error> {
    queue
        .current()
        .cloned()
        .map_err(|err| map_rotation_error(err, "current_member", None))
}

/// Slot at position `1`.
pub fn next_entry(queue: &RotationQueue<MemberId>) -> Result<QueueEntry, Error> {
    queue
        .next()
        .cloned()
        .map_err(|err| map_rotation_error(err, "next_member", None))
}

pub(crate) fn map_rotation_error(
    err: RotationError,
    operation: &str,
    member: Option<MemberId>,
) -> Error {
    let code = match err {
        RotationError::NotInQueue => ErrorCode::NotInQueue,
        RotationError::OutOfRange { .. } => ErrorCode::OutOfRange,
        RotationError::EmptyQueue => ErrorCode::EmptyQueue,
        RotationError::NoNextMember => ErrorCode::NoNextMember,
        RotationError::PositionGap { .. } | RotationError::DuplicateMember { .. } => {
            ErrorCode::InvariantViolation
        }
    };
    let message = match member {
        Some(member) => format!("{operation} failed for member {member}: {err}"),
        None => format!("{operation} failed: {err}"),
    };
    Error::new(code, message).with_details(json!({
        "operation": operation,
        "memberId": member,
    }))
}
