//! Cross-cutting turn rules.
//!
//! [`TurnCoordinator`] binds book lifecycle transitions to queue rotation:
//! completing a book advances the turn, promoting the next book realigns the
//! queue to its owner, and the emergency overrides adjust books and queue
//! together. Every method runs against one [`ClubState`] so the caller can
//! commit or discard the whole effect.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::lifecycle::no_current_book;
use super::{
    Book, BookDirectory, BookId, BookLifecycle, BookStatus, ClubState, Error, ErrorCode, Member,
    MemberDirectory, MemberId, QueueEntry, RotationEngine,
};

/// Result of completing the current book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    /// The book, now COMPLETED.
    pub book: Book,
    /// The owner after their turn was recorded.
    pub owner: Member,
    /// Whether the queue advanced.
    pub rotated: bool,
}

/// Result of skipping the current book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipOutcome {
    /// The book, now back on the wishlist.
    pub book: Book,
    /// Where the skipped turn holder landed, when the queue moved.
    pub moved: Option<QueueEntry>,
}

/// The first queued member with wishlist books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistCandidate {
    /// Queue slot of the member.
    pub entry: QueueEntry,
    /// The member.
    pub member: Member,
    /// Their WISHLIST books, ordered by id.
    pub books: Vec<Book>,
}

/// Orchestrates lifecycle transitions with queue rotation.
pub struct TurnCoordinator<'a> {
    state: &'a mut ClubState,
}

impl<'a> TurnCoordinator<'a> {
    /// Borrow the club state for one operation.
    pub fn new(state: &'a mut ClubState) -> Self {
        Self { state }
    }

    /// Make `book` the NEXT book.
    pub fn set_next_book(&mut self, book: BookId) -> Result<Book, Error> {
        BookLifecycle::new(&mut self.state.shelf).set_next(book)
    }

    /// Promote the NEXT book when nothing is CURRENT, then rotate the queue
    /// so an active owner holds the turn.
    ///
    /// Returns the promoted book, if any.
    pub fn promote_next_book_if_needed(&mut self) -> Result<Option<Book>, Error> {
        let Some(promoted) = BookLifecycle::new(&mut self.state.shelf).promote_next()? else {
            return Ok(None);
        };
        let owner = self.owner_of(&promoted, "promote_next_book")?;
        let (owner_id, owner_active) = (owner.id(), owner.is_active());
        if owner_active {
            RotationEngine::new(&mut self.state.queue, &self.state.roster)
                .rotate_to_member(owner_id)?;
        }
        Ok(Some(promoted))
    }

    /// Complete the CURRENT book on `today`.
    ///
    /// The owner's turn is recorded and, when the owner is active, the queue
    /// advances by one.
    pub fn complete_current_book(&mut self, today: NaiveDate) -> Result<CompletionOutcome, Error> {
        let current = self
            .state
            .shelf
            .current()
            .cloned()
            .ok_or_else(|| no_current_book("complete_current_book"))?;
        let owner_id = self.owner_of(&current, "complete_current_book")?.id();

        let book = BookLifecycle::new(&mut self.state.shelf).complete_current(today)?;
        let owner = self.state.roster.find_member_mut(owner_id)?;
        owner.record_pick(today);
        let owner = owner.clone();

        let rotated = owner.is_active();
        if rotated {
            RotationEngine::new(&mut self.state.queue, &self.state.roster).rotate();
        }
        Ok(CompletionOutcome {
            book,
            owner,
            rotated,
        })
    }

    /// Swap the CURRENT book for `replacement` without touching the queue.
    pub fn replace_current_book(&mut self, replacement: BookId) -> Result<(Book, Book), Error> {
        BookLifecycle::new(&mut self.state.shelf).replace_current(replacement)
    }

    /// Return the CURRENT book to the wishlist and move the turn holder to
    /// just after `place_after`.
    pub fn skip_current_book(&mut self, place_after: MemberId) -> Result<SkipOutcome, Error> {
        if self.state.shelf.current().is_none() {
            return Err(no_current_book("skip_current_book"));
        }
        self.state.roster.find_member(place_after)?;
        let moved = RotationEngine::new(&mut self.state.queue, &self.state.roster)
            .skip_current_member(place_after)?;
        let book = BookLifecycle::new(&mut self.state.shelf).demote_current("skip_current_book")?;
        Ok(SkipOutcome {
            book,
            moved: Some(moved),
        })
    }

    /// Return the CURRENT book of an inactive owner to the wishlist.
    ///
    /// The queue is left alone; an inactive owner holds no slot.
    pub fn skip_inactive_current_book(&mut self) -> Result<SkipOutcome, Error> {
        let current = self
            .state
            .shelf
            .current()
            .cloned()
            .ok_or_else(|| no_current_book("skip_inactive_current_book"))?;
        let owner = self.owner_of(&current, "skip_inactive_current_book")?;
        if owner.is_active() {
            return Err(Error::new(
                ErrorCode::OwnerStillActive,
                format!(
                    "owner {} of book {} is still active; skip the current book instead",
                    owner.id(),
                    current.id()
                ),
            )
            .with_details(json!({ "bookId": current.id(), "memberId": owner.id() })));
        }
        let book =
            BookLifecycle::new(&mut self.state.shelf).demote_current("skip_inactive_current_book")?;
        Ok(SkipOutcome { book, moved: None })
    }

    fn owner_of(&self, book: &Book, operation: &str) -> Result<&Member, Error> {
        self.state.roster.find_member(book.owner_id()).map_err(|_| {
            Error::new(
                ErrorCode::OwnerMissing,
                format!(
                    "{operation} failed: owner {} of book {} not found",
                    book.owner_id(),
                    book.id()
                ),
            )
            .with_details(json!({
                "operation": operation,
                "bookId": book.id(),
                "memberId": book.owner_id(),
            }))
        })
    }
}

/// Find the first queued member who owns WISHLIST books.
///
/// The scan starts at position `0`, skipping it when `current` is owned by
/// an active member, since that member is already taking a turn.
pub fn next_member_with_wishlist_books(
    state: &ClubState,
    current: Option<&Book>,
) -> Option<WishlistCandidate> {
    let skip_first = current.is_some_and(|book| state.roster.is_active(book.owner_id()));
    state
        .queue
        .slots()
        .iter()
        .skip(usize::from(skip_first))
        .find_map(|entry| {
            let books: Vec<Book> = state
                .shelf
                .owned_by(entry.member, BookStatus::Wishlist)
                .cloned()
                .collect();
            if books.is_empty() {
                return None;
            }
            let member = state.roster.find_member(entry.member).ok()?.clone();
            Some(WishlistCandidate {
                entry: entry.clone(),
                member,
                books,
            })
        })
}

#[cfg(test)]
#[path = "turn_coordinator_tests.rs"]
mod tests;
