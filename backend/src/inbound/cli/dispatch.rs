//! Route parsed commands to driving ports.

use serde::Serialize;

use super::command::{
    BookCommandArgs, ClubCommand, MemberCommandArgs, QueueCommandArgs, ReadCommandArgs, book,
    member,
};
use super::state::CliState;
use crate::domain::ports::{
    BackfillReport, BookFilter, NewBook, QuorumStatus, ReplacementOutcome,
};
use crate::domain::{
    Actor, Book, CompletionOutcome, CompletionRecord, Error, Member, QueueEntry, Rating,
    RatingAverages, RatingInput, Score, SkipOutcome, WishlistCandidate,
};

/// Result of one command, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Report {
    /// Queue slots in turn order.
    Queue(Vec<QueueEntry>),
    /// One queue slot.
    Entry(QueueEntry),
    /// Whether an append changed the queue.
    Queued(bool),
    /// One member.
    Member(Member),
    /// Several members.
    Members(Vec<Member>),
    /// One book.
    Book(Book),
    /// A book slot that may be empty.
    MaybeBook(Option<Book>),
    /// Several books.
    Books(Vec<Book>),
    /// A completed book.
    Completed(CompletionOutcome),
    /// An emergency replacement.
    Replaced(ReplacementOutcome),
    /// A skipped book.
    Skipped(SkipOutcome),
    /// The next member with wishlist books.
    Candidate(Option<WishlistCandidate>),
    /// One read mark.
    Record(CompletionRecord),
    /// Several read marks.
    Records(Vec<CompletionRecord>),
    /// Quorum standing.
    Quorum(QuorumStatus),
    /// Backfill results.
    Backfill(Vec<BackfillReport>),
    /// One rating.
    Rating(Rating),
    /// Several ratings.
    Ratings(Vec<Rating>),
    /// Mean scores per book.
    Averages(Vec<RatingAverages>),
}

/// Run `command` against `state`.
pub async fn dispatch(state: &CliState, command: ClubCommand) -> Result<Report, Error> {
    match command {
        ClubCommand::Queue(args) => dispatch_queue(state, args).await,
        ClubCommand::Member(args) => dispatch_member(state, args).await,
        ClubCommand::Book(args) => dispatch_book(state, args).await,
        ClubCommand::Read(args) => dispatch_read(state, args).await,
    }
}

async fn dispatch_queue(state: &CliState, args: QueueCommandArgs) -> Result<Report, Error> {
    let report = match args {
        QueueCommandArgs::Show => Report::Queue(state.queue_query.get_queue().await?),
        QueueCommandArgs::Current => Report::Entry(state.queue_query.get_current_member().await?),
        QueueCommandArgs::Next => Report::Entry(state.queue_query.get_next_member().await?),
        QueueCommandArgs::Add { member: id } => {
            Report::Queued(state.queue.add_member_to_queue(member(id)).await?)
        }
        QueueCommandArgs::Remove { member: id } => {
            Report::Entry(state.queue.remove_member_from_queue(member(id)).await?)
        }
        QueueCommandArgs::Move {
            member: id,
            position,
        } => Report::Queue(
            state
                .queue
                .move_member_to_position(member(id), position)
                .await?,
        ),
        QueueCommandArgs::Rotate { by } => {
            Report::Queue(state.queue.rotate_queue_by_positions(by).await?)
        }
        QueueCommandArgs::RotateTo { member: id } => {
            Report::Queue(state.queue.rotate_to_member(member(id)).await?)
        }
    };
    Ok(report)
}

async fn dispatch_member(state: &CliState, args: MemberCommandArgs) -> Result<Report, Error> {
    let report = match args {
        MemberCommandArgs::Register { name } => {
            Report::Member(state.roster.register_member(name).await?)
        }
        MemberCommandArgs::List => Report::Members(state.roster_query.list_members().await?),
        MemberCommandArgs::Show { member: id } => {
            Report::Member(state.roster_query.find_member(member(id)).await?)
        }
        MemberCommandArgs::Activate { member: id } => {
            Report::Member(state.roster.set_member_active(member(id), true).await?)
        }
        MemberCommandArgs::Deactivate { member: id } => {
            Report::Member(state.roster.set_member_active(member(id), false).await?)
        }
    };
    Ok(report)
}

async fn dispatch_book(state: &CliState, args: BookCommandArgs) -> Result<Report, Error> {
    let report = match args {
        BookCommandArgs::Add(args) => Report::Book(
            state
                .roster
                .add_book(NewBook {
                    owner: member(args.owner),
                    title: args.title,
                    author: args.author,
                })
                .await?,
        ),
        BookCommandArgs::List { status, owner } => {
            let filter = BookFilter {
                status: status.map(Into::into),
                owner: owner.map(member),
            };
            Report::Books(state.roster_query.list_books(filter).await?)
        }
        BookCommandArgs::Current => Report::MaybeBook(state.lifecycle_query.current_book().await?),
        BookCommandArgs::Next => Report::MaybeBook(state.lifecycle_query.next_book().await?),
        BookCommandArgs::SetNext { book: id } => {
            Report::Book(state.lifecycle.set_next_book(book(id)).await?)
        }
        BookCommandArgs::Promote => {
            Report::MaybeBook(state.lifecycle.promote_next_book_if_needed().await?)
        }
        BookCommandArgs::Complete { as_member } => {
            let outcome = match as_member {
                Some(id) => {
                    state
                        .lifecycle
                        .complete_current_book_as(Actor::Member(member(id)))
                        .await?
                }
                None => state.lifecycle.complete_current_book().await?,
            };
            Report::Completed(outcome)
        }
        BookCommandArgs::Replace { book: id } => {
            Report::Replaced(state.lifecycle.replace_current_book(book(id)).await?)
        }
        BookCommandArgs::Skip { after } => {
            Report::Skipped(state.lifecycle.skip_current_book(member(after)).await?)
        }
        BookCommandArgs::SkipInactive => {
            Report::Skipped(state.lifecycle.skip_inactive_current_book().await?)
        }
        BookCommandArgs::Recent { limit } => {
            Report::Books(state.lifecycle_query.recently_completed(limit).await?)
        }
        BookCommandArgs::Candidate => Report::Candidate(
            state
                .lifecycle_query
                .next_member_with_wishlist_books()
                .await?,
        ),
    };
    Ok(report)
}

async fn dispatch_read(state: &CliState, args: ReadCommandArgs) -> Result<Report, Error> {
    let report = match args {
        ReadCommandArgs::Mark { book: b, member: m } => {
            Report::Record(state.quorum.mark_read(book(b), member(m)).await?)
        }
        ReadCommandArgs::Unmark { book: b, member: m } => {
            Report::Record(state.quorum.unmark_read(book(b), member(m)).await?)
        }
        ReadCommandArgs::Status { book: b } => {
            Report::Quorum(state.quorum_query.quorum_status(book(b)).await?)
        }
        ReadCommandArgs::Readers { book: b } => {
            Report::Records(state.quorum_query.readers(book(b)).await?)
        }
        ReadCommandArgs::Backfill { book: None } => {
            Report::Backfill(state.quorum.backfill_completed_books().await?)
        }
        ReadCommandArgs::Backfill { book: Some(b) } => Report::Backfill(
            state
                .quorum
                .mark_book_read_by_all_active(book(b))
                .await?
                .into_iter()
                .collect(),
        ),
        ReadCommandArgs::Rate {
            book: b,
            member: m,
            readability,
            content,
            comment,
        } => {
            let input = RatingInput {
                readability: Score::try_new(readability)?,
                content: Score::try_new(content)?,
                comments: comment,
            };
            Report::Rating(state.rating.rate_book(book(b), member(m), input).await?)
        }
        ReadCommandArgs::Unrate { book: b, member: m } => {
            Report::Rating(state.rating.delete_rating(book(b), member(m)).await?)
        }
        ReadCommandArgs::Ratings { book: Some(b), .. } => {
            Report::Ratings(state.rating_query.ratings_for_book(book(b)).await?)
        }
        ReadCommandArgs::Ratings { book: None, member: m } => {
            let id = m.ok_or_else(|| Error::invalid_request("pass --book or --member"))?;
            Report::Ratings(state.rating_query.ratings_by_member(member(id)).await?)
        }
        ReadCommandArgs::Averages { books } => Report::Averages(
            state
                .rating_query
                .average_ratings_for_books(books.into_iter().map(book).collect())
                .await?,
        ),
    };
    Ok(report)
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
