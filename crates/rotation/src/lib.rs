//! Circular turn-order queue with dense zero-based positions.
//!
//! A [`RotationQueue`] keeps an ordered set of members, each holding exactly
//! one [`QueueSlot`]. For a queue of `N` slots the positions are always
//! `0..N` with no gaps and no repeats, and no member holds two slots.
//! Position `0` is the current turn holder, position `1` is next in line.
//!
//! Every mutation recomputes positions in one pass over the slots and then
//! re-sorts them, so the slice returned by [`RotationQueue::slots`] is the
//! turn order. The crate is storage agnostic: callers persist the slots and
//! rebuild the queue with [`RotationQueue::from_slots`], which re-checks the
//! layout.
//!
//! # Examples
//! ```
//! use rotation::RotationQueue;
//!
//! let mut queue = RotationQueue::new();
//! for member in ["ada", "bo", "cy"] {
//!     queue.append(member);
//! }
//! queue.rotate();
//! let order: Vec<_> = queue.members().copied().collect();
//! assert_eq!(order, ["bo", "cy", "ada"]);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// One member's place in the turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSlot<M> {
    /// Member holding the slot.
    pub member: M,
    /// Zero-based position; `0` is the current turn holder.
    pub position: usize,
}

impl<M> QueueSlot<M> {
    /// Build a slot for `member` at `position`.
    #[must_use]
    pub const fn new(member: M, position: usize) -> Self {
        Self { member, position }
    }
}

/// Errors raised by queue operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotationError {
    /// The member holds no slot.
    #[error("member is not in the queue")]
    NotInQueue,
    /// The requested position lies outside `0..len`.
    #[error("position {position} is out of range for a queue of {len}")]
    OutOfRange {
        /// Requested position.
        position: usize,
        /// Queue length at the time of the request.
        len: usize,
    },
    /// No slot exists at position `0`.
    #[error("the queue is empty")]
    EmptyQueue,
    /// No slot exists at position `1`.
    #[error("the queue has no member at position 1")]
    NoNextMember,
    /// Positions are not exactly `0..len`.
    #[error("queue layout expected position {expected} but found {found}")]
    PositionGap {
        /// Position the slot should hold.
        expected: usize,
        /// Position the slot actually holds.
        found: usize,
    },
    /// A member holds more than one slot.
    #[error("member at position {position} already holds an earlier slot")]
    DuplicateMember {
        /// Position of the repeated slot.
        position: usize,
    },
}

/// Ordered circular sequence of members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RotationQueue<M> {
    slots: Vec<QueueSlot<M>>,
}

impl<M> Default for RotationQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> RotationQueue<M> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the queue holds no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in ascending position order.
    #[must_use]
    pub fn slots(&self) -> &[QueueSlot<M>] {
        &self.slots
    }

    /// Members in turn order.
    #[must_use]
    pub fn members(&self) -> impl Iterator<Item = &M> {
        self.slots.iter().map(|slot| &slot.member)
    }

    /// Slot at position `0`.
    pub fn current(&self) -> Result<&QueueSlot<M>, RotationError> {
        self.slots.first().ok_or(RotationError::EmptyQueue)
    }

    /// Slot at position `1`.
    pub fn next(&self) -> Result<&QueueSlot<M>, RotationError> {
        self.slots.get(1).ok_or(RotationError::NoNextMember)
    }

    /// Advance the turn order by one: the current holder moves to the back.
    pub fn rotate(&mut self) -> usize {
        self.rotate_by(1)
    }

    /// Advance the turn order by `positions` slots.
    ///
    /// The amount is normalised modulo the queue length, so negative values
    /// rotate backwards and any multiple of the length is a no-op. Each slot
    /// moves from `p` to `(p + N - k) mod N`. Returns the normalised shift
    /// that was applied (`0` when nothing moved).
    pub fn rotate_by(&mut self, positions: i64) -> usize {
        let shift = normalize_shift(positions, self.slots.len());
        self.rotate_forward(shift);
        shift
    }

    fn rotate_forward(&mut self, shift: usize) {
        let len = self.slots.len();
        if len <= 1 || shift == 0 {
            return;
        }
        for slot in &mut self.slots {
            slot.position = (slot.position + len - shift).rem_euclid(len);
        }
        self.sort_by_position();
    }

    fn sort_by_position(&mut self) {
        self.slots.sort_unstable_by_key(|slot| slot.position);
    }
}

impl<M: PartialEq> RotationQueue<M> {
    /// Rebuild a queue from persisted slots, validating the layout.
    ///
    /// Slots may arrive in any order; they are sorted by position before the
    /// density and uniqueness checks run.
    pub fn from_slots(mut slots: Vec<QueueSlot<M>>) -> Result<Self, RotationError> {
        slots.sort_by_key(|slot| slot.position);
        let queue = Self { slots };
        queue.check_invariants()?;
        Ok(queue)
    }

    /// Confirm positions are exactly `0..len` and members are unique.
    pub fn check_invariants(&self) -> Result<(), RotationError> {
        for (expected, slot) in self.slots.iter().enumerate() {
            if slot.position != expected {
                return Err(RotationError::PositionGap {
                    expected,
                    found: slot.position,
                });
            }
            let repeated = self
                .slots
                .iter()
                .take(expected)
                .any(|earlier| earlier.member == slot.member);
            if repeated {
                return Err(RotationError::DuplicateMember { position: expected });
            }
        }
        Ok(())
    }

    /// Position held by `member`, if any.
    #[must_use]
    pub fn position_of(&self, member: &M) -> Option<usize> {
        self.slots
            .iter()
            .find(|slot| &slot.member == member)
            .map(|slot| slot.position)
    }

    /// Whether `member` holds a slot.
    #[must_use]
    pub fn contains(&self, member: &M) -> bool {
        self.position_of(member).is_some()
    }

    /// Append `member` at the back.
    ///
    /// Returns `false` without changing anything when the member is already
    /// queued.
    pub fn append(&mut self, member: M) -> bool {
        if self.contains(&member) {
            return false;
        }
        let position = self.slots.len();
        self.slots.push(QueueSlot::new(member, position));
        true
    }

    /// Remove `member` and close the gap it leaves.
    pub fn remove(&mut self, member: &M) -> Result<QueueSlot<M>, RotationError> {
        let removed_at = self.position_of(member).ok_or(RotationError::NotInQueue)?;
        let removed = self.slots.remove(removed_at);
        for slot in &mut self.slots {
            if slot.position > removed_at {
                slot.position -= 1;
            }
        }
        Ok(removed)
    }

    /// Move `member` to `new_position`, shifting the members in between.
    ///
    /// Moving back (to a higher position) pulls every slot in
    /// `(old, new]` forward by one; moving forward pushes every slot in
    /// `[new, old)` back by one. All positions are reassigned in a single
    /// pass; nothing is swapped.
    pub fn move_to(&mut self, member: &M, new_position: usize) -> Result<(), RotationError> {
        let old_position = self.position_of(member).ok_or(RotationError::NotInQueue)?;
        let len = self.slots.len();
        if new_position >= len {
            return Err(RotationError::OutOfRange {
                position: new_position,
                len,
            });
        }
        if new_position == old_position {
            return Ok(());
        }

        for slot in &mut self.slots {
            let position = slot.position;
            if position == old_position {
                slot.position = new_position;
            } else if old_position < new_position
                && position > old_position
                && position <= new_position
            {
                slot.position = position - 1;
            } else if new_position < old_position
                && position >= new_position
                && position < old_position
            {
                slot.position = position + 1;
            }
        }
        self.sort_by_position();
        Ok(())
    }

    /// Move `member` so it sits immediately after `anchor`.
    ///
    /// Returns the member's final position. Placing a member after itself
    /// changes nothing.
    pub fn place_after(&mut self, member: &M, anchor: &M) -> Result<usize, RotationError> {
        let from = self.position_of(member).ok_or(RotationError::NotInQueue)?;
        let anchor_at = self.position_of(anchor).ok_or(RotationError::NotInQueue)?;
        let target = match anchor_at.cmp(&from) {
            Ordering::Greater => anchor_at,
            Ordering::Less => anchor_at + 1,
            Ordering::Equal => return Ok(from),
        };
        self.move_to(member, target)?;
        Ok(target)
    }

    /// Rotate until `member` holds position `0`.
    ///
    /// The cyclic order of everyone else is preserved. Returns the shift
    /// that was applied.
    pub fn rotate_to(&mut self, member: &M) -> Result<usize, RotationError> {
        let position = self.position_of(member).ok_or(RotationError::NotInQueue)?;
        self.rotate_forward(position);
        Ok(position)
    }
}

impl<'de, M> Deserialize<'de> for RotationQueue<M>
where
    M: Deserialize<'de> + PartialEq,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let slots = Vec::<QueueSlot<M>>::deserialize(deserializer)?;
        Self::from_slots(slots).map_err(serde::de::Error::custom)
    }
}

/// Reduce `positions` into `0..len`, treating negative values as backwards.
fn normalize_shift(positions: i64, len: usize) -> usize {
    let Ok(modulus) = i128::try_from(len) else {
        return 0;
    };
    if modulus <= 1 {
        return 0;
    }
    let shift = i128::from(positions).rem_euclid(modulus);
    usize::try_from(shift).unwrap_or(0)
}
