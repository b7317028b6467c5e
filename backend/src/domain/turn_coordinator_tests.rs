//! Tests for turn coordination rules.

use chrono::NaiveDate;
use rstest::{fixture, rstest};

use super::*;

const ADA: MemberId = MemberId::new(1);
const BO: MemberId = MemberId::new(2);
const CY: MemberId = MemberId::new(3);
const DI: MemberId = MemberId::new(4);

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 9).expect("valid date")
}

fn add_book(state: &mut ClubState, id: u64, owner: MemberId, status: BookStatus) {
    let mut book = Book::try_new(BookId::new(id), owner, "Title", "Author").expect("valid book");
    book.transition(status);
    state.shelf.insert(book).expect("insert book");
}

fn order(state: &ClubState) -> Vec<MemberId> {
    state.queue().members().copied().collect()
}

fn status_of(state: &ClubState, id: u64) -> BookStatus {
    state
        .shelf()
        .find_book(BookId::new(id))
        .expect("known book")
        .status()
}

/// Four active members queued A, B, C, D. Ada's book 10 is CURRENT.
#[fixture]
fn club() -> ClubState {
    let mut state = ClubState::default();
    for (id, name) in [(ADA, "Ada"), (BO, "Bo"), (CY, "Cy"), (DI, "Di")] {
        let member = Member::try_new(id, name).expect("valid member");
        state.roster.insert(member).expect("insert member");
        state.queue.append(id);
    }
    add_book(&mut state, 10, ADA, BookStatus::Current);
    add_book(&mut state, 20, CY, BookStatus::Wishlist);
    add_book(&mut state, 21, CY, BookStatus::Wishlist);
    add_book(&mut state, 30, DI, BookStatus::Wishlist);
    state
}

fn deactivate(state: &mut ClubState, member: MemberId) {
    state
        .roster
        .find_member_mut(member)
        .expect("known member")
        .set_active(false);
    state.queue.remove(&member).expect("queued member");
}

#[rstest]
fn completing_rotates_active_owner_to_back(mut club: ClubState) {
    let outcome = TurnCoordinator::new(&mut club)
        .complete_current_book(day())
        .expect("current book exists");

    assert_eq!(outcome.book.status(), BookStatus::Completed);
    assert_eq!(outcome.book.completion_date(), Some(day()));
    assert_eq!(outcome.owner.total_picks(), 1);
    assert_eq!(outcome.owner.last_pick_date(), Some(day()));
    assert!(outcome.rotated);
    assert_eq!(order(&club), [BO, CY, DI, ADA]);
}

#[rstest]
fn completing_for_inactive_owner_leaves_queue(mut club: ClubState) {
    deactivate(&mut club, ADA);
    let outcome = TurnCoordinator::new(&mut club)
        .complete_current_book(day())
        .expect("current book exists");
    assert!(!outcome.rotated);
    assert_eq!(order(&club), [BO, CY, DI]);
}

#[rstest]
fn completing_with_missing_owner_fails(mut club: ClubState) {
    let mut orphan = club.shelf.find_book(BookId::new(10)).expect("book").clone();
    orphan.transition(BookStatus::Wishlist);
    club.shelf.save(orphan).expect("demote");
    add_book(&mut club, 99, MemberId::new(77), BookStatus::Current);

    let err = TurnCoordinator::new(&mut club)
        .complete_current_book(day())
        .expect_err("owner 77 is unknown");
    assert_eq!(err.code(), ErrorCode::OwnerMissing);
}

#[rstest]
fn promotion_realigns_queue_to_owner(mut club: ClubState) {
    let mut coordinator = TurnCoordinator::new(&mut club);
    coordinator.complete_current_book(day()).expect("complete");
    coordinator.set_next_book(BookId::new(30)).expect("set next");
    let promoted = coordinator
        .promote_next_book_if_needed()
        .expect("promotion succeeds")
        .expect("a book was promoted");

    assert_eq!(promoted.id(), BookId::new(30));
    assert_eq!(order(&club), [DI, ADA, BO, CY]);
    assert_eq!(status_of(&club, 30), BookStatus::Current);
}

#[rstest]
fn promotion_waits_while_a_book_is_current(mut club: ClubState) {
    let mut coordinator = TurnCoordinator::new(&mut club);
    coordinator.set_next_book(BookId::new(20)).expect("set next");
    assert_eq!(coordinator.promote_next_book_if_needed().expect("no error"), None);
    assert_eq!(status_of(&club, 20), BookStatus::Next);
    assert_eq!(order(&club), [ADA, BO, CY, DI]);
}

#[rstest]
fn promotion_without_next_book_is_noop(mut club: ClubState) {
    let mut coordinator = TurnCoordinator::new(&mut club);
    coordinator.complete_current_book(day()).expect("complete");
    assert_eq!(coordinator.promote_next_book_if_needed().expect("no error"), None);
}

#[rstest]
fn replace_does_not_rotate(mut club: ClubState) {
    let (old, new) = TurnCoordinator::new(&mut club)
        .replace_current_book(BookId::new(20))
        .expect("both books exist");
    assert_eq!(old.status(), BookStatus::Wishlist);
    assert_eq!(new.status(), BookStatus::Current);
    assert_eq!(order(&club), [ADA, BO, CY, DI]);
}

#[rstest]
fn skip_moves_turn_holder_after_anchor(mut club: ClubState) {
    let outcome = TurnCoordinator::new(&mut club)
        .skip_current_book(CY)
        .expect("skip succeeds");
    assert_eq!(outcome.book.status(), BookStatus::Wishlist);
    assert_eq!(outcome.moved.map(|slot| slot.position), Some(2));
    assert_eq!(order(&club), [BO, CY, ADA, DI]);
}

#[rstest]
fn skip_requires_current_book(mut club: ClubState) {
    TurnCoordinator::new(&mut club)
        .complete_current_book(day())
        .expect("complete");
    let err = TurnCoordinator::new(&mut club)
        .skip_current_book(CY)
        .expect_err("no current book");
    assert_eq!(err.code(), ErrorCode::NoCurrentBook);
}

#[rstest]
fn skip_inactive_rejects_active_owner(mut club: ClubState) {
    let err = TurnCoordinator::new(&mut club)
        .skip_inactive_current_book()
        .expect_err("Ada is active");
    assert_eq!(err.code(), ErrorCode::OwnerStillActive);
    assert_eq!(status_of(&club, 10), BookStatus::Current);
}

#[rstest]
fn skip_inactive_demotes_without_moving_queue(mut club: ClubState) {
    deactivate(&mut club, ADA);
    let outcome = TurnCoordinator::new(&mut club)
        .skip_inactive_current_book()
        .expect("owner inactive");
    assert_eq!(outcome.book.status(), BookStatus::Wishlist);
    assert!(outcome.moved.is_none());
    assert_eq!(order(&club), [BO, CY, DI]);
}

#[rstest]
fn wishlist_scan_skips_active_turn_holder(club: ClubState) {
    let current = club.shelf().current().cloned();
    let candidate =
        next_member_with_wishlist_books(&club, current.as_ref()).expect("Cy has wishlist books");
    assert_eq!(candidate.member.id(), CY);
    assert_eq!(candidate.entry.position, 2);
    let ids: Vec<_> = candidate.books.iter().map(Book::id).collect();
    assert_eq!(ids, [BookId::new(20), BookId::new(21)]);
}

#[rstest]
fn wishlist_scan_includes_position_zero_without_current(mut club: ClubState) {
    add_book(&mut club, 40, ADA, BookStatus::Wishlist);
    let candidate = next_member_with_wishlist_books(&club, None).expect("Ada has a wishlist book");
    assert_eq!(candidate.member.id(), ADA);
}

#[rstest]
fn wishlist_scan_returns_none_when_nobody_qualifies() {
    let mut state = ClubState::default();
    let member = Member::try_new(ADA, "Ada").expect("valid member");
    state.roster.insert(member).expect("insert member");
    state.queue.append(ADA);
    assert!(next_member_with_wishlist_books(&state, None).is_none());
}

#[rstest]
fn lifecycle_sequences_keep_singletons(mut club: ClubState) {
    let mut coordinator = TurnCoordinator::new(&mut club);
    coordinator.set_next_book(BookId::new(20)).expect("set next");
    coordinator.set_next_book(BookId::new(30)).expect("set next");
    coordinator.replace_current_book(BookId::new(21)).expect("replace");
    coordinator.complete_current_book(day()).expect("complete");
    coordinator.promote_next_book_if_needed().expect("promote");
    coordinator.set_next_book(BookId::new(20)).expect("set next");
    club.check_invariants().expect("invariants hold");
    assert_eq!(club.shelf().with_status(BookStatus::Current).count(), 1);
    assert_eq!(club.shelf().with_status(BookStatus::Next).count(), 1);
}
