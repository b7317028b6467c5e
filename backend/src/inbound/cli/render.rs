//! Terminal rendering for command results.

use std::fmt::Write as _;

use super::dispatch::Report;
use crate::domain::{Book, Error, Member, QueueEntry, Rating};

/// Render `report` as pretty JSON or as plain text lines.
pub fn render(report: &Report, json: bool) -> Result<String, Error> {
    if json {
        return serde_json::to_string_pretty(report)
            .map_err(|err| Error::internal(format!("encode report: {err}")));
    }
    Ok(render_text(report))
}

/// Render a failure for standard error.
pub fn render_error(error: &Error, json: bool) -> String {
    if json {
        if let Ok(encoded) = serde_json::to_string_pretty(error) {
            return encoded;
        }
    }
    format!("error ({:?}): {}", error.code(), error.message())
}

fn render_text(report: &Report) -> String {
    let mut out = String::new();
    match report {
        Report::Queue(entries) if entries.is_empty() => out.push_str("(queue is empty)"),
        Report::Queue(entries) => {
            let lines: Vec<String> = entries.iter().map(entry_line).collect();
            out.push_str(&lines.join("\n"));
        }
        Report::Entry(entry) => out.push_str(&entry_line(entry)),
        Report::Queued(true) => out.push_str("queued"),
        Report::Queued(false) => out.push_str("already queued"),
        Report::Member(member) => out.push_str(&member_line(member)),
        Report::Members(members) => {
            let lines: Vec<String> = members.iter().map(member_line).collect();
            out.push_str(&lines.join("\n"));
        }
        Report::Book(book) => out.push_str(&book_line(book)),
        Report::MaybeBook(Some(book)) => out.push_str(&book_line(book)),
        Report::MaybeBook(None) => out.push_str("(none)"),
        Report::Books(books) if books.is_empty() => out.push_str("(no books)"),
        Report::Books(books) => {
            let lines: Vec<String> = books.iter().map(book_line).collect();
            out.push_str(&lines.join("\n"));
        }
        Report::Completed(outcome) => {
            out.push_str(&book_line(&outcome.book));
            let effect = if outcome.rotated {
                "turn advanced"
            } else {
                "queue unchanged"
            };
            let _ = write!(out, "\n{}: {effect}", outcome.owner.name());
        }
        Report::Replaced(outcome) => {
            let _ = write!(
                out,
                "previous: {}\ncurrent: {}",
                book_line(&outcome.previous),
                book_line(&outcome.current)
            );
        }
        Report::Skipped(outcome) => {
            out.push_str(&book_line(&outcome.book));
            if let Some(moved) = &outcome.moved {
                let _ = write!(
                    out,
                    "\nmember {} moved to position {}",
                    moved.member, moved.position
                );
            }
        }
        Report::Candidate(None) => out.push_str("(nobody has wishlist books)"),
        Report::Candidate(Some(candidate)) => {
            let _ = write!(
                out,
                "{}. {}",
                candidate.entry.position,
                member_line(&candidate.member)
            );
            for book in &candidate.books {
                let _ = write!(out, "\n  {}", book_line(book));
            }
        }
        Report::Record(record) => {
            let _ = write!(
                out,
                "book {} read by member {} on {}",
                record.book_id, record.member_id, record.completion_date
            );
        }
        Report::Records(records) if records.is_empty() => out.push_str("(no readers)"),
        Report::Records(records) => {
            let lines: Vec<String> = records
                .iter()
                .map(|record| format!("member {} on {}", record.member_id, record.completion_date))
                .collect();
            out.push_str(&lines.join("\n"));
        }
        Report::Quorum(status) => {
            let verdict = if status.completable {
                "completable"
            } else {
                "not completable"
            };
            let _ = write!(
                out,
                "book {}: {} of {} required readers, {} active members ({verdict})",
                status.book_id, status.read_count, status.required_readers, status.active_members
            );
        }
        Report::Backfill(reports) if reports.is_empty() => out.push_str("(nothing to backfill)"),
        Report::Backfill(reports) => {
            let lines: Vec<String> = reports
                .iter()
                .map(|report| {
                    let threshold = if report.meets_all_but_one {
                        "meets"
                    } else {
                        "misses"
                    };
                    format!(
                        "book {}: +{} marks, {} readers, {threshold} all-but-one",
                        report.book_id, report.added, report.read_count
                    )
                })
                .collect();
            out.push_str(&lines.join("\n"));
        }
        Report::Rating(rating) => out.push_str(&rating_line(rating)),
        Report::Ratings(ratings) if ratings.is_empty() => out.push_str("(no ratings)"),
        Report::Ratings(ratings) => {
            let lines: Vec<String> = ratings.iter().map(rating_line).collect();
            out.push_str(&lines.join("\n"));
        }
        Report::Averages(averages) => {
            let lines: Vec<String> = averages
                .iter()
                .map(|avg| {
                    format!(
                        "book {}: readability {:.2}, content {:.2} from {} ratings",
                        avg.book_id, avg.readability, avg.content, avg.count
                    )
                })
                .collect();
            out.push_str(&lines.join("\n"));
        }
    }
    out
}

fn rating_line(rating: &Rating) -> String {
    let mut line = format!(
        "book {} by member {}: readability {}, content {} on {}",
        rating.book_id, rating.member_id, rating.readability, rating.content, rating.rated_on
    );
    if let Some(comments) = &rating.comments {
        let _ = write!(line, " \"{comments}\"");
    }
    line
}

fn entry_line(entry: &QueueEntry) -> String {
    format!("{}. member {}", entry.position, entry.member)
}

fn member_line(member: &Member) -> String {
    let status = if member.is_active() {
        "active"
    } else {
        "inactive"
    };
    let last_pick = member
        .last_pick_date()
        .map_or_else(|| "-".to_owned(), |date| date.to_string());
    format!(
        "#{} {} [{status}] picks={} last_pick={last_pick}",
        member.id(),
        member.name(),
        member.total_picks()
    )
}

fn book_line(book: &Book) -> String {
    let mut line = format!(
        "#{} \"{}\" by {} [{}] owner={}",
        book.id(),
        book.title(),
        book.author(),
        book.status(),
        book.owner_id()
    );
    if let Some(date) = book.completion_date() {
        let _ = write!(line, " completed={date}");
    }
    line
}

#[cfg(test)]
mod tests {
    //! Text and JSON rendering.

    use rstest::rstest;

    use super::*;
    use crate::domain::{BookId, ErrorCode, MemberId, RatingAverages, Score};

    fn ada() -> Member {
        Member::try_new(MemberId::new(1), "Ada").expect("valid member")
    }

    #[rstest]
    fn queue_renders_one_line_per_slot() {
        let report = Report::Queue(vec![
            QueueEntry::new(MemberId::new(2), 0),
            QueueEntry::new(MemberId::new(1), 1),
        ]);
        assert_eq!(
            render(&report, false).expect("render"),
            "0. member 2\n1. member 1"
        );
    }

    #[rstest]
    fn empty_queue_says_so() {
        assert_eq!(
            render(&Report::Queue(Vec::new()), false).expect("render"),
            "(queue is empty)"
        );
    }

    #[rstest]
    fn member_line_shows_status_and_picks() {
        assert_eq!(
            render(&Report::Member(ada()), false).expect("render"),
            "#1 Ada [active] picks=0 last_pick=-"
        );
    }

    #[rstest]
    fn book_line_shows_status() {
        let book = Book::try_new(BookId::new(7), MemberId::new(1), "Dune", "Frank Herbert")
            .expect("valid book");
        assert_eq!(
            render(&Report::Book(book), false).expect("render"),
            "#7 \"Dune\" by Frank Herbert [WISHLIST] owner=1"
        );
    }

    #[rstest]
    fn rating_line_includes_comment() {
        let rating = Rating {
            book_id: BookId::new(3),
            member_id: MemberId::new(1),
            readability: Score::try_new(4).expect("valid score"),
            content: Score::try_new(2).expect("valid score"),
            comments: Some("Too long".to_owned()),
            rated_on: chrono::NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date"),
        };
        assert_eq!(
            render(&Report::Rating(rating), false).expect("render"),
            "book 3 by member 1: readability 4/5, content 2/5 on 2026-03-14 \"Too long\""
        );
    }

    #[rstest]
    fn averages_use_two_decimals() {
        let report = Report::Averages(vec![RatingAverages {
            book_id: BookId::new(3),
            count: 3,
            readability: 11.0 / 3.0,
            content: 4.0,
        }]);
        assert_eq!(
            render(&report, false).expect("render"),
            "book 3: readability 3.67, content 4.00 from 3 ratings"
        );
    }

    #[rstest]
    fn json_report_is_tagged() {
        let rendered = render(&Report::Queued(true), true).expect("render");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(value["kind"], "queued");
        assert_eq!(value["data"], true);
    }

    #[rstest]
    fn errors_render_code_and_message() {
        let error = Error::new(ErrorCode::NotInQueue, "member 4 is not queued");
        assert_eq!(
            render_error(&error, false),
            "error (NotInQueue): member 4 is not queued"
        );
        let value: serde_json::Value =
            serde_json::from_str(&render_error(&error, true)).expect("valid json");
        assert_eq!(value["code"], "not_in_queue");
    }
}
