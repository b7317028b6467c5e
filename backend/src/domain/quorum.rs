//! Read-completion records and the quorum needed to finish a book.
//!
//! [`CompletionQuorum`] holds one record per `(book, member)` pair. Records
//! for books that are no longer current stay in place as history; they never
//! gate later cycles because every check is scoped to a single book.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{BookId, Error, ErrorCode, MemberId};

/// One member's record of having finished a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    /// Book that was read.
    pub book_id: BookId,
    /// Member who read it.
    pub member_id: MemberId,
    /// Date the read was recorded.
    pub completion_date: NaiveDate,
}

/// How many readers a book needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuorumThreshold {
    /// Half the active members, rounded up. Gates normal completion.
    Majority,
    /// Every active member but one. Used when backfilling finished books.
    AllButOne,
}

impl QuorumThreshold {
    /// Readers required for `active_members`; never less than one.
    ///
    /// # Examples
    /// ```
    /// use bookclub::domain::QuorumThreshold;
    ///
    /// assert_eq!(QuorumThreshold::Majority.required_readers(5), 3);
    /// assert_eq!(QuorumThreshold::AllButOne.required_readers(5), 4);
    /// assert_eq!(QuorumThreshold::AllButOne.required_readers(0), 1);
    /// ```
    pub fn required_readers(self, active_members: usize) -> usize {
        let required = match self {
            Self::Majority => active_members.div_ceil(2),
            Self::AllButOne => active_members.saturating_sub(1),
        };
        required.max(1)
    }
}

/// Ledger of completion records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CompletionRecord>", into = "Vec<CompletionRecord>")]
pub struct CompletionQuorum {
    records: BTreeMap<(BookId, MemberId), NaiveDate>,
}

impl CompletionQuorum {
    /// Record that `member` finished `book` on `on`.
    pub fn mark_read(
        &mut self,
        book: BookId,
        member: MemberId,
        on: NaiveDate,
    ) -> Result<CompletionRecord, Error> {
        if self.records.contains_key(&(book, member)) {
            return Err(Error::new(
                ErrorCode::AlreadyRead,
                format!("member {member} already marked book {book} as read"),
            )
            .with_details(json!({ "bookId": book, "memberId": member })));
        }
        self.records.insert((book, member), on);
        Ok(CompletionRecord {
            book_id: book,
            member_id: member,
            completion_date: on,
        })
    }

    /// Retract a read mark, returning the removed record.
    pub fn unmark_read(&mut self, book: BookId, member: MemberId) -> Result<CompletionRecord, Error> {
        self.records
            .remove(&(book, member))
            .map(|completion_date| CompletionRecord {
                book_id: book,
                member_id: member,
                completion_date,
            })
            .ok_or_else(|| {
                Error::new(
                    ErrorCode::NotRead,
                    format!("member {member} has not marked book {book} as read"),
                )
                .with_details(json!({ "bookId": book, "memberId": member }))
            })
    }

    /// Whether `member` marked `book` as read.
    pub fn has_read(&self, book: BookId, member: MemberId) -> bool {
        self.records.contains_key(&(book, member))
    }

    /// Number of members who read `book`.
    pub fn read_count(&self, book: BookId) -> usize {
        self.for_book(book).count()
    }

    /// Records for `book`, ordered by member id.
    pub fn readers(&self, book: BookId) -> Vec<CompletionRecord> {
        self.for_book(book).collect()
    }

    /// Whether enough members read `book` to complete it.
    pub fn is_completable(&self, book: BookId, active_members: usize) -> bool {
        self.read_count(book) >= QuorumThreshold::Majority.required_readers(active_members)
    }

    /// Mark `book` as read by every member in `members` lacking a record.
    ///
    /// Returns how many records were added.
    pub fn mark_read_by_all(
        &mut self,
        book: BookId,
        members: impl IntoIterator<Item = MemberId>,
        on: NaiveDate,
    ) -> usize {
        members
            .into_iter()
            .filter(|member| self.mark_read(book, *member, on).is_ok())
            .count()
    }

    /// All records ordered by book then member.
    pub fn iter(&self) -> impl Iterator<Item = CompletionRecord> + '_ {
        self.records
            .iter()
            .map(|(&(book_id, member_id), &completion_date)| CompletionRecord {
                book_id,
                member_id,
                completion_date,
            })
    }

    fn for_book(&self, book: BookId) -> impl Iterator<Item = CompletionRecord> + '_ {
        self.iter().filter(move |record| record.book_id == book)
    }
}

impl TryFrom<Vec<CompletionRecord>> for CompletionQuorum {
    type Error = Error;

    fn try_from(records: Vec<CompletionRecord>) -> Result<Self, Self::Error> {
        let mut quorum = Self::default();
        for record in records {
            quorum
                .mark_read(record.book_id, record.member_id, record.completion_date)
                .map_err(|err| Error::invariant_violation(format!("duplicate completion record: {err}")))?;
        }
        Ok(quorum)
    }
}

impl From<CompletionQuorum> for Vec<CompletionRecord> {
    fn from(quorum: CompletionQuorum) -> Self {
        quorum.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    //! Quorum arithmetic and ledger behaviour.

    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).expect("valid date")
    }

    #[rstest]
    #[case(QuorumThreshold::Majority, 0, 1)]
    #[case(QuorumThreshold::Majority, 1, 1)]
    #[case(QuorumThreshold::Majority, 4, 2)]
    #[case(QuorumThreshold::Majority, 7, 4)]
    #[case(QuorumThreshold::AllButOne, 1, 1)]
    #[case(QuorumThreshold::AllButOne, 2, 1)]
    #[case(QuorumThreshold::AllButOne, 6, 5)]
    fn required_readers_follows_threshold(
        #[case] threshold: QuorumThreshold,
        #[case] active: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(threshold.required_readers(active), expected);
    }

    #[rstest]
    fn marking_twice_fails_with_already_read(day: NaiveDate) {
        let mut quorum = CompletionQuorum::default();
        let book = BookId::new(1);
        let member = MemberId::new(5);
        quorum.mark_read(book, member, day).expect("first mark");
        let err = quorum.mark_read(book, member, day).expect_err("second mark");
        assert_eq!(err.code(), ErrorCode::AlreadyRead);
        assert_eq!(quorum.read_count(book), 1);
    }

    #[rstest]
    fn unmark_reports_missing_record() {
        let mut quorum = CompletionQuorum::default();
        let err = quorum
            .unmark_read(BookId::new(1), MemberId::new(1))
            .expect_err("nothing to retract");
        assert_eq!(err.code(), ErrorCode::NotRead);
    }

    #[rstest]
    fn unmark_removes_record(day: NaiveDate) {
        let mut quorum = CompletionQuorum::default();
        quorum.mark_read(BookId::new(1), MemberId::new(1), day).expect("mark");
        let record = quorum.unmark_read(BookId::new(1), MemberId::new(1)).expect("unmark");
        assert_eq!(record.completion_date, day);
        assert!(!quorum.has_read(BookId::new(1), MemberId::new(1)));
    }

    #[rstest]
    fn two_of_four_readers_is_completable(day: NaiveDate) {
        let mut quorum = CompletionQuorum::default();
        let book = BookId::new(3);
        quorum.mark_read(book, MemberId::new(1), day).expect("mark");
        assert!(!quorum.is_completable(book, 4));
        quorum.mark_read(book, MemberId::new(2), day).expect("mark");
        assert!(quorum.is_completable(book, 4));
    }

    #[rstest]
    fn counts_are_scoped_per_book(day: NaiveDate) {
        let mut quorum = CompletionQuorum::default();
        quorum.mark_read(BookId::new(1), MemberId::new(1), day).expect("mark");
        quorum.mark_read(BookId::new(2), MemberId::new(1), day).expect("mark");
        quorum.mark_read(BookId::new(2), MemberId::new(2), day).expect("mark");
        assert_eq!(quorum.read_count(BookId::new(1)), 1);
        let readers: Vec<_> = quorum
            .readers(BookId::new(2))
            .into_iter()
            .map(|record| record.member_id)
            .collect();
        assert_eq!(readers, [MemberId::new(1), MemberId::new(2)]);
    }

    #[rstest]
    fn mark_read_by_all_skips_existing_records(day: NaiveDate) {
        let mut quorum = CompletionQuorum::default();
        let book = BookId::new(1);
        quorum.mark_read(book, MemberId::new(2), day).expect("mark");
        let added = quorum.mark_read_by_all(book, [1, 2, 3].map(MemberId::new), day);
        assert_eq!(added, 2);
        assert_eq!(quorum.read_count(book), 3);
    }

    #[rstest]
    fn deserialising_rejects_duplicate_records(day: NaiveDate) {
        let record = CompletionRecord {
            book_id: BookId::new(1),
            member_id: MemberId::new(1),
            completion_date: day,
        };
        let json = serde_json::to_value([record, record]).expect("serialise records");
        assert!(serde_json::from_value::<CompletionQuorum>(json).is_err());
    }
}
