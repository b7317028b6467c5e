//! Shared fixtures for service tests.
//!
//! [`recording_repository`] backs a mocked repository with a single slot so
//! tests can run several operations in sequence and inspect what was saved.

use std::sync::{Arc, Mutex};

use super::ports::MockClubStateRepository;
use super::{Book, BookId, BookStatus, ClubState, ClubUnitOfWork, Member, MemberId};
use crate::test_support::fixture_clock;

pub(crate) const ADA: MemberId = MemberId::new(1);
pub(crate) const BO: MemberId = MemberId::new(2);
pub(crate) const CY: MemberId = MemberId::new(3);
pub(crate) const DI: MemberId = MemberId::new(4);

/// Four active members queued A, B, C, D.
///
/// Ada's book 10 is CURRENT, Cy proposed 20 and Di proposed 30.
pub(crate) fn seeded_club() -> ClubState {
    let mut state = ClubState::default();
    for (id, name) in [(ADA, "Ada"), (BO, "Bo"), (CY, "Cy"), (DI, "Di")] {
        let member = Member::try_new(id, name).expect("valid member");
        state.roster.insert(member).expect("insert member");
        state.queue.append(id);
    }
    for (id, owner, status) in [
        (10, ADA, BookStatus::Current),
        (20, CY, BookStatus::Wishlist),
        (30, DI, BookStatus::Wishlist),
    ] {
        let mut book =
            Book::try_new(BookId::new(id), owner, "Title", "Author").expect("valid book");
        book.transition(status);
        state.shelf.insert(book).expect("insert book");
    }
    state
}

/// Shared slot holding the last committed state.
pub(crate) type StateSlot = Arc<Mutex<ClubState>>;

/// Mocked repository whose saves land in the returned slot and whose loads
/// read from it.
pub(crate) fn recording_repository(initial: ClubState) -> (MockClubStateRepository, StateSlot) {
    let slot = Arc::new(Mutex::new(initial));
    let mut repository = MockClubStateRepository::new();
    let load_slot = Arc::clone(&slot);
    repository
        .expect_load()
        .returning(move || Ok(load_slot.lock().expect("state lock").clone()));
    let save_slot = Arc::clone(&slot);
    repository.expect_save().returning(move |state, _| {
        *save_slot.lock().expect("state lock") = state.clone();
        Ok(())
    });
    (repository, slot)
}

/// Unit of work over a recording repository seeded with `initial`.
pub(crate) fn recording_unit_of_work(
    initial: ClubState,
) -> (ClubUnitOfWork<MockClubStateRepository>, StateSlot) {
    let (repository, slot) = recording_repository(initial);
    (ClubUnitOfWork::new(Arc::new(repository), fixture_clock()), slot)
}

/// Snapshot of the slot.
pub(crate) fn committed(slot: &StateSlot) -> ClubState {
    slot.lock().expect("state lock").clone()
}
