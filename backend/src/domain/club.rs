//! The club aggregate: every piece of state the turn machinery touches.
//!
//! A [`ClubState`] is loaded, mutated and saved as a unit, so one operation
//! either lands completely or not at all. The revision counter backs the
//! optimistic check performed when a snapshot is saved.

use rotation::RotationQueue;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    Book, CompletionQuorum, CompletionRecord, Error, Member, MemberId, Rating, RatingLedger,
    Roster, Shelf,
};

/// Complete club state.
///
/// ## Invariants
/// - Queue positions are exactly `0..N` and no member is queued twice.
/// - Every queued member is on the roster.
/// - At most one book is CURRENT and at most one is NEXT.
/// - Every rating names a known book and a known member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClubSnapshot", into = "ClubSnapshot")]
pub struct ClubState {
    revision: u64,
    pub(crate) roster: Roster,
    pub(crate) shelf: Shelf,
    pub(crate) queue: RotationQueue<MemberId>,
    pub(crate) quorum: CompletionQuorum,
    pub(crate) ratings: RatingLedger,
}

impl ClubState {
    /// Revision of the last committed save; `0` for a fresh club.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Members.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Books.
    pub fn shelf(&self) -> &Shelf {
        &self.shelf
    }

    /// Turn order.
    pub fn queue(&self) -> &RotationQueue<MemberId> {
        &self.queue
    }

    /// Read-completion ledger.
    pub fn quorum(&self) -> &CompletionQuorum {
        &self.quorum
    }

    /// Member ratings.
    pub fn ratings(&self) -> &RatingLedger {
        &self.ratings
    }

    /// Validate every aggregate invariant.
    pub fn check_invariants(&self) -> Result<(), Error> {
        self.queue.check_invariants().map_err(|err| {
            Error::invariant_violation(format!("turn queue is corrupt: {err}"))
        })?;
        if let Some(stray) = self.queue.members().find(|id| !self.roster.contains(**id)) {
            return Err(Error::invariant_violation(format!(
                "queued member {stray} is not on the roster"
            ))
            .with_details(json!({ "memberId": stray })));
        }
        if let Some(stray) = self.ratings.iter().find(|rating| {
            !self.roster.contains(rating.member_id)
                || !self.shelf.iter().any(|book| book.id() == rating.book_id)
        }) {
            return Err(Error::invariant_violation(format!(
                "rating of book {} by member {} names an unknown book or member",
                stray.book_id, stray.member_id
            ))
            .with_details(json!({ "bookId": stray.book_id, "memberId": stray.member_id })));
        }
        self.shelf.check_invariants()
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }
}

/// Serialised layout of a [`ClubState`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClubSnapshot {
    revision: u64,
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    books: Vec<Book>,
    #[serde(default)]
    queue: RotationQueue<MemberId>,
    #[serde(default)]
    completions: Vec<CompletionRecord>,
    #[serde(default)]
    ratings: Vec<Rating>,
}

impl From<ClubState> for ClubSnapshot {
    fn from(state: ClubState) -> Self {
        Self {
            revision: state.revision,
            members: state.roster.iter().cloned().collect(),
            books: state.shelf.iter().cloned().collect(),
            queue: state.queue,
            completions: state.quorum.into(),
            ratings: state.ratings.into(),
        }
    }
}

impl TryFrom<ClubSnapshot> for ClubState {
    type Error = Error;

    fn try_from(snapshot: ClubSnapshot) -> Result<Self, Self::Error> {
        let member_count = snapshot.members.len();
        let book_count = snapshot.books.len();
        let roster: Roster = snapshot.members.into_iter().collect();
        let shelf: Shelf = snapshot.books.into_iter().collect();
        if roster.len() != member_count || shelf.len() != book_count {
            return Err(Error::invariant_violation("snapshot repeats a member or book id"));
        }
        let state = Self {
            revision: snapshot.revision,
            roster,
            shelf,
            queue: snapshot.queue,
            quorum: CompletionQuorum::try_from(snapshot.completions)?,
            ratings: RatingLedger::try_from(snapshot.ratings)?,
        };
        state.check_invariants()?;
        Ok(state)
    }
}
