//! Who may complete the current book.
//!
//! A member may complete the current book only after marking it read and
//! once a majority of active members have done the same. A privileged actor
//! bypasses both checks.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::lifecycle::no_current_book;
use super::{ClubState, Error, ErrorCode, MemberDirectory, MemberId, QuorumThreshold};

/// The party asking to complete the current book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "memberId")]
pub enum Actor {
    /// An ordinary member.
    Member(MemberId),
    /// An operator allowed to bypass the quorum.
    Privileged,
}

/// Check whether `actor` may complete the current book.
pub fn check_completion_gate(state: &ClubState, actor: Actor) -> Result<(), Error> {
    let book = state
        .shelf
        .current()
        .ok_or_else(|| no_current_book("complete_current_book"))?;
    let Actor::Member(member) = actor else {
        return Ok(());
    };
    state.roster.find_member(member)?;

    if !state.quorum.has_read(book.id(), member) {
        return Err(Error::forbidden(format!(
            "member {member} must mark book {} as read before completing it",
            book.id()
        ))
        .with_details(json!({ "bookId": book.id(), "memberId": member })));
    }

    let active = state.roster.count_active();
    if !state.quorum.is_completable(book.id(), active) {
        let read = state.quorum.read_count(book.id());
        let required = QuorumThreshold::Majority.required_readers(active);
        return Err(Error::new(
            ErrorCode::QuorumNotMet,
            format!("{read} of {required} required members have read book {}", book.id()),
        )
        .with_details(json!({
            "bookId": book.id(),
            "readCount": read,
            "requiredReaders": required,
            "activeMembers": active,
        })));
    }
    Ok(())
}
