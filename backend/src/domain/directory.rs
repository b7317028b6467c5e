//! Member and book directories.
//!
//! [`MemberDirectory`] and [`BookDirectory`] are the lookups the turn
//! machinery consumes. [`Roster`] and [`Shelf`] are the in-aggregate tables
//! implementing them.
//!
//! The shelf enforces the CURRENT and NEXT singletons on write: storing a
//! book in either status while another book already holds it is refused, so
//! callers must demote the incumbent first.

use std::collections::BTreeMap;

use serde_json::json;

use super::{Book, BookId, BookStatus, Error, ErrorCode, Member, MemberId};

/// Read access to member identity and activity.
pub trait MemberDirectory {
    /// Look up a member.
    fn find_member(&self, id: MemberId) -> Result<&Member, Error>;

    /// Whether the member exists and is active.
    fn is_active(&self, id: MemberId) -> bool;

    /// Number of active members.
    fn count_active(&self) -> usize;
}

/// Lookup and storage of books.
pub trait BookDirectory {
    /// Look up a book.
    fn find_book(&self, id: BookId) -> Result<&Book, Error>;

    /// Store `book`, replacing any book with the same id.
    fn save(&mut self, book: Book) -> Result<(), Error>;
}

/// Members keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    members: BTreeMap<MemberId, Member>,
}

impl Roster {
    /// Members ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Number of members, active or not.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether no members exist.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `id` names a known member.
    pub fn contains(&self, id: MemberId) -> bool {
        self.members.contains_key(&id)
    }

    /// Find a member by exact name.
    pub fn find_by_name(&self, name: &str) -> Option<&Member> {
        self.members.values().find(|member| member.name() == name)
    }

    /// Identifier one above the highest in use.
    pub fn next_id(&self) -> MemberId {
        let next = self
            .members
            .keys()
            .next_back()
            .map_or(1, |id| id.get().saturating_add(1));
        MemberId::new(next)
    }

    pub(crate) fn insert(&mut self, member: Member) -> Result<(), Error> {
        if self.members.contains_key(&member.id()) {
            return Err(Error::conflict(format!("member {} already exists", member.id())));
        }
        self.members.insert(member.id(), member);
        Ok(())
    }

    pub(crate) fn find_member_mut(&mut self, id: MemberId) -> Result<&mut Member, Error> {
        self.members.get_mut(&id).ok_or_else(|| member_not_found(id))
    }
}

impl MemberDirectory for Roster {
    fn find_member(&self, id: MemberId) -> Result<&Member, Error> {
        self.members.get(&id).ok_or_else(|| member_not_found(id))
    }

    fn is_active(&self, id: MemberId) -> bool {
        self.members.get(&id).is_some_and(Member::is_active)
    }

    fn count_active(&self) -> usize {
        self.members.values().filter(|member| member.is_active()).count()
    }
}

/// Books keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shelf {
    books: BTreeMap<BookId, Book>,
}

impl Shelf {
    /// Books ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// Number of books.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the shelf holds no books.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Books in `status`, ordered by id.
    pub fn with_status(&self, status: BookStatus) -> impl Iterator<Item = &Book> {
        self.books.values().filter(move |book| book.status() == status)
    }

    /// Books owned by `owner` in `status`, ordered by id.
    pub fn owned_by(&self, owner: MemberId, status: BookStatus) -> impl Iterator<Item = &Book> {
        self.with_status(status)
            .filter(move |book| book.owner_id() == owner)
    }

    /// The CURRENT book, if any.
    pub fn current(&self) -> Option<&Book> {
        self.with_status(BookStatus::Current).next()
    }

    /// The NEXT book, if any.
    pub fn next(&self) -> Option<&Book> {
        self.with_status(BookStatus::Next).next()
    }

    /// Identifier one above the highest in use.
    pub fn next_id(&self) -> BookId {
        let next = self
            .books
            .keys()
            .next_back()
            .map_or(1, |id| id.get().saturating_add(1));
        BookId::new(next)
    }

    /// Confirm at most one CURRENT and at most one NEXT book exist and that
    /// completion dates agree with status.
    pub fn check_invariants(&self) -> Result<(), Error> {
        for status in [BookStatus::Current, BookStatus::Next] {
            let holders: Vec<u64> = self.with_status(status).map(|book| book.id().get()).collect();
            if holders.len() > 1 {
                return Err(
                    Error::invariant_violation(format!("more than one {status} book"))
                        .with_details(json!({ "status": status, "bookIds": holders })),
                );
            }
        }
        if let Some(book) = self.iter().find(|book| !book.completion_date_consistent()) {
            return Err(Error::invariant_violation(format!(
                "book {} has a completion date but is {}",
                book.id(),
                book.status()
            )));
        }
        Ok(())
    }

    /// Insert a book that must not exist yet.
    pub(crate) fn insert(&mut self, book: Book) -> Result<(), Error> {
        if self.books.contains_key(&book.id()) {
            return Err(Error::conflict(format!("book {} already exists", book.id())));
        }
        self.save(book)
    }

    fn singleton_holder(&self, status: BookStatus, except: BookId) -> Option<BookId> {
        self.with_status(status)
            .map(Book::id)
            .find(|id| *id != except)
    }
}

impl BookDirectory for Shelf {
    fn find_book(&self, id: BookId) -> Result<&Book, Error> {
        self.books.get(&id).ok_or_else(|| {
            Error::not_found(format!("book {id} not found")).with_details(json!({ "bookId": id }))
        })
    }

    fn save(&mut self, book: Book) -> Result<(), Error> {
        let status = book.status();
        if matches!(status, BookStatus::Current | BookStatus::Next) {
            if let Some(holder) = self.singleton_holder(status, book.id()) {
                return Err(Error::new(
                    ErrorCode::InvariantViolation,
                    format!("book {holder} is already {status}"),
                )
                .with_details(json!({ "bookId": book.id(), "holderId": holder })));
            }
        }
        self.books.insert(book.id(), book);
        Ok(())
    }
}

fn member_not_found(id: MemberId) -> Error {
    Error::not_found(format!("member {id} not found")).with_details(json!({ "memberId": id }))
}

impl FromIterator<Member> for Roster {
    fn from_iter<T: IntoIterator<Item = Member>>(iter: T) -> Self {
        Self {
            members: iter.into_iter().map(|member| (member.id(), member)).collect(),
        }
    }
}

impl FromIterator<Book> for Shelf {
    fn from_iter<T: IntoIterator<Item = Book>>(iter: T) -> Self {
        Self {
            books: iter.into_iter().map(|book| (book.id(), book)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Directory lookups and singleton enforcement.

    use super::*;
    use rstest::{fixture, rstest};

    fn book(id: u64, status: BookStatus) -> Book {
        let mut book = Book::try_new(BookId::new(id), MemberId::new(1), "Title", "Author")
            .expect("valid book");
        book.transition(status);
        book
    }

    #[fixture]
    fn roster() -> Roster {
        let ada = Member::try_new(MemberId::new(1), "Ada").expect("valid member");
        let mut bo = Member::try_new(MemberId::new(2), "Bo").expect("valid member");
        bo.set_active(false);
        [ada, bo].into_iter().collect()
    }

    #[rstest]
    fn roster_counts_active_members(roster: Roster) {
        assert_eq!(roster.count_active(), 1);
        assert!(roster.is_active(MemberId::new(1)));
        assert!(!roster.is_active(MemberId::new(2)));
        assert!(!roster.is_active(MemberId::new(9)));
    }

    #[rstest]
    fn roster_reports_unknown_members(roster: Roster) {
        let err = roster.find_member(MemberId::new(9)).expect_err("unknown member");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(roster.next_id(), MemberId::new(3));
    }

    #[rstest]
    fn shelf_refuses_second_current_book() {
        let mut shelf: Shelf = [book(1, BookStatus::Current)].into_iter().collect();
        let err = shelf
            .save(book(2, BookStatus::Current))
            .expect_err("second CURRENT book");
        assert_eq!(err.code(), ErrorCode::InvariantViolation);
        assert_eq!(shelf.len(), 1);
    }

    #[rstest]
    fn shelf_allows_resaving_singleton_holder() {
        let mut shelf: Shelf = [book(1, BookStatus::Next)].into_iter().collect();
        shelf.save(book(1, BookStatus::Next)).expect("same book keeps NEXT");
        assert_eq!(shelf.next().map(Book::id), Some(BookId::new(1)));
    }

    #[rstest]
    fn check_invariants_flags_duplicate_next_books() {
        let shelf: Shelf = [book(1, BookStatus::Next), book(2, BookStatus::Next)]
            .into_iter()
            .collect();
        let err = shelf.check_invariants().expect_err("two NEXT books");
        assert_eq!(err.code(), ErrorCode::InvariantViolation);
    }

    #[rstest]
    fn owned_by_filters_owner_and_status() {
        let shelf: Shelf = [book(1, BookStatus::Wishlist), book(2, BookStatus::Completed)]
            .into_iter()
            .collect();
        let ids: Vec<_> = shelf
            .owned_by(MemberId::new(1), BookStatus::Wishlist)
            .map(Book::id)
            .collect();
        assert_eq!(ids, [BookId::new(1)]);
    }
}
