//! Member ratings of books.
//!
//! Each member holds at most one [`Rating`] per book. Rating again replaces
//! the scores and comment but keeps the date of the first rating.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{BookId, Error, MemberId};

/// Longest comment accepted, in characters.
pub const MAX_COMMENT_CHARS: usize = 1000;

/// A score on the 1 to 5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    /// Lowest score.
    pub const MIN: u8 = 1;
    /// Highest score.
    pub const MAX: u8 = 5;

    /// Validate `value` against the scale.
    ///
    /// # Examples
    /// ```
    /// use bookclub::domain::Score;
    ///
    /// assert_eq!(Score::try_new(4).map(Score::get).ok(), Some(4));
    /// assert!(Score::try_new(0).is_err());
    /// assert!(Score::try_new(6).is_err());
    /// ```
    pub fn try_new(value: u8) -> Result<Self, Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::invalid_request(format!(
                "score {value} is outside {}..={}",
                Self::MIN,
                Self::MAX
            ))
            .with_details(json!({ "score": value })))
        }
    }

    /// Raw value.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// One member's rating of one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    /// Rated book.
    pub book_id: BookId,
    /// Member who rated it.
    pub member_id: MemberId,
    /// How easy the book was to read.
    pub readability: Score,
    /// How good the content was.
    pub content: Score,
    /// Free-form comment, trimmed; absent when blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Date the rating was first recorded.
    pub rated_on: NaiveDate,
}

/// Scores and comment submitted for a rating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingInput {
    /// Readability score.
    pub readability: Score,
    /// Content score.
    pub content: Score,
    /// Optional comment.
    pub comments: Option<String>,
}

/// Mean scores for one book. Both means are `0.0` when nobody rated it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingAverages {
    /// Book the means describe.
    pub book_id: BookId,
    /// Number of ratings averaged.
    pub count: usize,
    /// Mean readability score.
    pub readability: f64,
    /// Mean content score.
    pub content: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    readability: Score,
    content: Score,
    comments: Option<String>,
    rated_on: NaiveDate,
}

/// Ledger of ratings keyed by `(book, member)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rating>", into = "Vec<Rating>")]
pub struct RatingLedger {
    entries: BTreeMap<(BookId, MemberId), Entry>,
}

fn normalise_comment(comments: Option<String>) -> Result<Option<String>, Error> {
    let Some(text) = comments else {
        return Ok(None);
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let chars = trimmed.chars().count();
    if chars > MAX_COMMENT_CHARS {
        return Err(Error::invalid_request(format!(
            "comment has {chars} characters; the limit is {MAX_COMMENT_CHARS}"
        )));
    }
    Ok(Some(trimmed.to_owned()))
}

impl RatingLedger {
    /// Create or replace the rating `member` gave `book`.
    ///
    /// A replaced rating keeps its original date.
    pub fn upsert(
        &mut self,
        book: BookId,
        member: MemberId,
        input: RatingInput,
        on: NaiveDate,
    ) -> Result<Rating, Error> {
        let comments = normalise_comment(input.comments)?;
        let rated_on = self
            .entries
            .get(&(book, member))
            .map_or(on, |existing| existing.rated_on);
        let entry = Entry {
            readability: input.readability,
            content: input.content,
            comments,
            rated_on,
        };
        let rating = to_rating(book, member, &entry);
        self.entries.insert((book, member), entry);
        Ok(rating)
    }

    /// Remove the rating `member` gave `book`, returning it.
    pub fn remove(&mut self, book: BookId, member: MemberId) -> Result<Rating, Error> {
        self.entries
            .remove(&(book, member))
            .map(|entry| to_rating(book, member, &entry))
            .ok_or_else(|| {
                Error::not_found(format!("member {member} has not rated book {book}"))
                    .with_details(json!({ "bookId": book, "memberId": member }))
            })
    }

    /// Ratings of `book`, ordered by member id.
    pub fn for_book(&self, book: BookId) -> Vec<Rating> {
        self.iter().filter(|rating| rating.book_id == book).collect()
    }

    /// Ratings given by `member`, ordered by book id.
    pub fn by_member(&self, member: MemberId) -> Vec<Rating> {
        self.iter().filter(|rating| rating.member_id == member).collect()
    }

    /// Mean scores for `book`.
    pub fn averages(&self, book: BookId) -> RatingAverages {
        let (count, readability, content) = self
            .entries
            .iter()
            .filter(|((rated, _), _)| *rated == book)
            .fold((0_u32, 0_u32, 0_u32), |(n, r, c), (_, entry)| {
                (
                    n + 1,
                    r + u32::from(entry.readability.get()),
                    c + u32::from(entry.content.get()),
                )
            });
        let mean = |total: u32| {
            if count == 0 {
                0.0
            } else {
                f64::from(total) / f64::from(count)
            }
        };
        RatingAverages {
            book_id: book,
            count: usize::try_from(count).unwrap_or(usize::MAX),
            readability: mean(readability),
            content: mean(content),
        }
    }

    /// All ratings ordered by book then member.
    pub fn iter(&self) -> impl Iterator<Item = Rating> + '_ {
        self.entries
            .iter()
            .map(|(&(book, member), entry)| to_rating(book, member, entry))
    }
}

fn to_rating(book: BookId, member: MemberId, entry: &Entry) -> Rating {
    Rating {
        book_id: book,
        member_id: member,
        readability: entry.readability,
        content: entry.content,
        comments: entry.comments.clone(),
        rated_on: entry.rated_on,
    }
}

impl TryFrom<Vec<Rating>> for RatingLedger {
    type Error = Error;

    fn try_from(ratings: Vec<Rating>) -> Result<Self, Self::Error> {
        let mut ledger = Self::default();
        for rating in ratings {
            let key = (rating.book_id, rating.member_id);
            if ledger.entries.contains_key(&key) {
                return Err(Error::invariant_violation(format!(
                    "duplicate rating of book {} by member {}",
                    rating.book_id, rating.member_id
                )));
            }
            let entry = Entry {
                readability: rating.readability,
                content: rating.content,
                comments: normalise_comment(rating.comments)?,
                rated_on: rating.rated_on,
            };
            ledger.entries.insert(key, entry);
        }
        Ok(ledger)
    }
}

impl From<RatingLedger> for Vec<Rating> {
    fn from(ledger: RatingLedger) -> Self {
        ledger.iter().collect()
    }
}
