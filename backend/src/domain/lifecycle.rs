//! Book status state machine.
//!
//! Transitions demote an incumbent before promoting its replacement so the
//! shelf never holds two CURRENT or two NEXT books, even transiently.

use chrono::NaiveDate;
use serde_json::json;

use super::{Book, BookDirectory, BookId, BookStatus, Error, ErrorCode, Shelf};

/// Mutating view over the shelf that owns every status change.
pub struct BookLifecycle<'a> {
    shelf: &'a mut Shelf,
}

impl<'a> BookLifecycle<'a> {
    /// Borrow the shelf.
    pub fn new(shelf: &'a mut Shelf) -> Self {
        Self { shelf }
    }

    /// Make `book` the NEXT book, returning any previous NEXT book to the
    /// wishlist.
    pub fn set_next(&mut self, book: BookId) -> Result<Book, Error> {
        let mut target = self.shelf.find_book(book)?.clone();
        let incumbents: Vec<Book> = self
            .shelf
            .with_status(BookStatus::Next)
            .filter(|next| next.id() != book)
            .cloned()
            .collect();
        for mut incumbent in incumbents {
            incumbent.transition(BookStatus::Wishlist);
            self.shelf.save(incumbent)?;
        }
        target.transition(BookStatus::Next);
        self.shelf.save(target.clone())?;
        Ok(target)
    }

    /// Promote the NEXT book when nothing is CURRENT.
    ///
    /// Returns the promoted book, or `None` when no promotion applies.
    pub fn promote_next(&mut self) -> Result<Option<Book>, Error> {
        if self.shelf.current().is_some() {
            return Ok(None);
        }
        let Some(next) = self.shelf.next().cloned() else {
            return Ok(None);
        };
        let mut promoted = next;
        promoted.transition(BookStatus::Current);
        self.shelf.save(promoted.clone())?;
        Ok(Some(promoted))
    }

    /// Mark the CURRENT book as completed on `on`.
    pub fn complete_current(&mut self, on: NaiveDate) -> Result<Book, Error> {
        let mut book = self.current("complete_current_book")?;
        book.complete(on);
        self.shelf.save(book.clone())?;
        Ok(book)
    }

    /// Swap the CURRENT book for `replacement`.
    ///
    /// The old book returns to the wishlist. Returns `(old, new)`.
    pub fn replace_current(&mut self, replacement: BookId) -> Result<(Book, Book), Error> {
        let mut old = self.current("replace_current_book")?;
        let mut new = self.shelf.find_book(replacement)?.clone();
        if old.id() == new.id() {
            return Ok((old, new));
        }
        old.transition(BookStatus::Wishlist);
        self.shelf.save(old.clone())?;
        new.transition(BookStatus::Current);
        self.shelf.save(new.clone())?;
        Ok((old, new))
    }

    /// Return the CURRENT book to the wishlist.
    pub fn demote_current(&mut self, operation: &str) -> Result<Book, Error> {
        let mut book = self.current(operation)?;
        book.transition(BookStatus::Wishlist);
        self.shelf.save(book.clone())?;
        Ok(book)
    }

    fn current(&self, operation: &str) -> Result<Book, Error> {
        self.shelf
            .current()
            .cloned()
            .ok_or_else(|| no_current_book(operation))
    }
}

/// How many books the club history view lists by default.
pub const RECENT_COMPLETIONS: usize = 5;

/// Up to `limit` COMPLETED books, most recently completed first.
///
/// Books completed on the same day are listed by descending id.
pub fn recently_completed(shelf: &Shelf, limit: usize) -> Vec<Book> {
    let mut completed: Vec<&Book> = shelf.with_status(BookStatus::Completed).collect();
    completed.sort_by(|left, right| {
        right
            .completion_date()
            .cmp(&left.completion_date())
            .then_with(|| right.id().cmp(&left.id()))
    });
    completed.into_iter().take(limit).cloned().collect()
}

pub(crate) fn no_current_book(operation: &str) -> Error {
    Error::new(ErrorCode::NoCurrentBook, format!("{operation} failed: no current book"))
        .with_details(json!({ "operation": operation }))
}

#[cfg(test)]
mod tests {
    //! State machine transitions over a small shelf.

    use super::*;
    use crate::domain::MemberId;
    use rstest::{fixture, rstest};

    fn book(id: u64, status: BookStatus) -> Book {
        let mut book = Book::try_new(BookId::new(id), MemberId::new(id), "Title", "Author")
            .expect("valid book");
        book.transition(status);
        book
    }

    fn status_of(shelf: &Shelf, id: u64) -> BookStatus {
        shelf.find_book(BookId::new(id)).expect("known book").status()
    }

    #[fixture]
    fn shelf() -> Shelf {
        [
            book(1, BookStatus::Current),
            book(2, BookStatus::Next),
            book(3, BookStatus::Wishlist),
        ]
        .into_iter()
        .collect()
    }

    #[fixture]
    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).expect("valid date")
    }

    #[rstest]
    fn set_next_demotes_previous_next(mut shelf: Shelf) {
        BookLifecycle::new(&mut shelf)
            .set_next(BookId::new(3))
            .expect("book exists");
        assert_eq!(status_of(&shelf, 2), BookStatus::Wishlist);
        assert_eq!(status_of(&shelf, 3), BookStatus::Next);
        shelf.check_invariants().expect("one NEXT book");
    }

    #[rstest]
    fn set_next_rejects_unknown_book(mut shelf: Shelf) {
        let err = BookLifecycle::new(&mut shelf)
            .set_next(BookId::new(9))
            .expect_err("unknown book");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    fn promote_next_waits_for_current_to_clear(mut shelf: Shelf, day: NaiveDate) {
        let mut lifecycle = BookLifecycle::new(&mut shelf);
        assert_eq!(lifecycle.promote_next().expect("no error"), None);
        lifecycle.complete_current(day).expect("current exists");
        let promoted = lifecycle.promote_next().expect("no error").expect("promoted");
        assert_eq!(promoted.id(), BookId::new(2));
        assert_eq!(status_of(&shelf, 1), BookStatus::Completed);
        assert_eq!(status_of(&shelf, 2), BookStatus::Current);
    }

    #[rstest]
    fn complete_current_sets_completion_date(mut shelf: Shelf, day: NaiveDate) {
        let book = BookLifecycle::new(&mut shelf)
            .complete_current(day)
            .expect("current exists");
        assert_eq!(book.completion_date(), Some(day));
    }

    #[rstest]
    fn replace_current_swaps_books(mut shelf: Shelf) {
        let (old, new) = BookLifecycle::new(&mut shelf)
            .replace_current(BookId::new(3))
            .expect("both exist");
        assert_eq!(old.status(), BookStatus::Wishlist);
        assert_eq!(new.status(), BookStatus::Current);
        assert_eq!(status_of(&shelf, 1), BookStatus::Wishlist);
        shelf.check_invariants().expect("one CURRENT book");
    }

    #[rstest]
    fn replace_current_with_next_book_clears_next(mut shelf: Shelf) {
        BookLifecycle::new(&mut shelf)
            .replace_current(BookId::new(2))
            .expect("both exist");
        assert!(shelf.next().is_none());
        assert_eq!(shelf.current().map(Book::id), Some(BookId::new(2)));
    }

    #[rstest]
    fn recently_completed_lists_newest_first(day: NaiveDate) {
        let mut shelf = Shelf::default();
        for (id, offset) in [(1, 3), (2, 1), (3, 1), (4, 7)] {
            let mut done = book(id, BookStatus::Wishlist);
            done.complete(day + chrono::Days::new(offset));
            shelf.insert(done).expect("insert");
        }
        shelf.insert(book(5, BookStatus::Wishlist)).expect("insert");

        let ids: Vec<u64> = recently_completed(&shelf, 3)
            .iter()
            .map(|book| book.id().get())
            .collect();
        assert_eq!(ids, [4, 1, 3]);
        assert!(recently_completed(&shelf, 0).is_empty());
    }

    #[rstest]
    fn operations_without_current_book_fail(day: NaiveDate) {
        let mut shelf: Shelf = [book(1, BookStatus::Wishlist)].into_iter().collect();
        let mut lifecycle = BookLifecycle::new(&mut shelf);
        let outcomes = [
            lifecycle.complete_current(day).map(|_| ()),
            lifecycle.replace_current(BookId::new(1)).map(|_| ()),
            lifecycle.demote_current("skip_current_book").map(|_| ()),
        ]
        .map(|outcome| outcome.map_err(|err| err.code()));
        assert_eq!(outcomes, [Err(ErrorCode::NoCurrentBook); 3]);
    }
}
