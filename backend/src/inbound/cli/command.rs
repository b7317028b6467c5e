//! Command-line grammar.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::{BookId, BookStatus, MemberId, RECENT_COMPLETIONS};

/// `bookclub` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "bookclub",
    about = "Coordinate whose turn it is to pick the next book club read",
    version
)]
pub struct Cli {
    /// Directory holding the club snapshot. Overrides `BOOKCLUB_STATE_DIR`.
    #[arg(long = "state-dir", value_name = "path", global = true)]
    pub state_dir: Option<PathBuf>,
    /// Snapshot file name. Overrides `BOOKCLUB_STATE_FILE`.
    #[arg(long = "state-file", value_name = "name", global = true)]
    pub state_file: Option<String>,
    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,
    /// Operation to run.
    #[command(subcommand)]
    pub command: ClubCommand,
}

/// Top-level command groups.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ClubCommand {
    /// Inspect or reorder the turn queue.
    #[command(subcommand)]
    Queue(QueueCommandArgs),
    /// Register members and change their status.
    #[command(subcommand)]
    Member(MemberCommandArgs),
    /// Propose, schedule and finish books.
    #[command(subcommand)]
    Book(BookCommandArgs),
    /// Record who has read a book.
    #[command(subcommand)]
    Read(ReadCommandArgs),
}

/// Turn queue operations.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum QueueCommandArgs {
    /// Print the queue in turn order.
    Show,
    /// Print the member whose turn it is.
    Current,
    /// Print the member after the current one.
    Next,
    /// Append a member to the back of the queue.
    Add {
        /// Member id.
        member: u64,
    },
    /// Remove a member from the queue.
    Remove {
        /// Member id.
        member: u64,
    },
    /// Move a member to a zero-based position.
    Move {
        /// Member id.
        member: u64,
        /// Target position.
        position: usize,
    },
    /// Advance the turn; negative values rotate backwards.
    Rotate {
        /// Number of positions.
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        by: i64,
    },
    /// Rotate until a member holds the turn.
    RotateTo {
        /// Member id.
        member: u64,
    },
}

/// Roster operations.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum MemberCommandArgs {
    /// Register a new active member at the back of the queue.
    Register {
        /// Display name.
        name: String,
    },
    /// List every member.
    List,
    /// Show one member.
    Show {
        /// Member id.
        member: u64,
    },
    /// Reactivate a member and queue them at the back.
    Activate {
        /// Member id.
        member: u64,
    },
    /// Deactivate a member and drop them from the queue.
    Deactivate {
        /// Member id.
        member: u64,
    },
}

/// Book lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum BookCommandArgs {
    /// Add a book to a member's wishlist.
    Add(NewBookArgs),
    /// List books, optionally filtered.
    List {
        /// Only books in this status.
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        /// Only books proposed by this member.
        #[arg(long)]
        owner: Option<u64>,
    },
    /// Show the CURRENT book.
    Current,
    /// Show the NEXT book.
    Next,
    /// Make a book the NEXT book.
    SetNext {
        /// Book id.
        book: u64,
    },
    /// Promote the NEXT book when nothing is CURRENT.
    Promote,
    /// Complete the CURRENT book and advance the turn.
    Complete {
        /// Complete on behalf of this member, enforcing the read quorum.
        #[arg(long = "as", value_name = "member")]
        as_member: Option<u64>,
    },
    /// Swap the CURRENT book without advancing the turn.
    Replace {
        /// Replacement book id.
        book: u64,
    },
    /// Drop the CURRENT book and move its picker after another member.
    Skip {
        /// Member the skipped picker should follow.
        #[arg(long)]
        after: u64,
    },
    /// Drop the CURRENT book of an inactive owner.
    SkipInactive,
    /// List recently completed books.
    Recent {
        /// Maximum number of books.
        #[arg(long, default_value_t = RECENT_COMPLETIONS)]
        limit: usize,
    },
    /// Show the next queued member with wishlist books.
    Candidate,
}

/// Arguments for adding a book.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct NewBookArgs {
    /// Proposing member id.
    #[arg(long)]
    pub owner: u64,
    /// Title.
    #[arg(long)]
    pub title: String,
    /// Author.
    #[arg(long)]
    pub author: String,
}

/// Read-mark operations.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ReadCommandArgs {
    /// Record that a member finished a book.
    Mark {
        /// Book id.
        book: u64,
        /// Member id.
        member: u64,
    },
    /// Retract a read mark.
    Unmark {
        /// Book id.
        book: u64,
        /// Member id.
        member: u64,
    },
    /// Show the quorum standing of a book.
    Status {
        /// Book id.
        book: u64,
    },
    /// List who read a book.
    Readers {
        /// Book id.
        book: u64,
    },
    /// Mark completed books as read by every active member.
    Backfill {
        /// Only this book.
        #[arg(long)]
        book: Option<u64>,
    },
    /// Rate a book, replacing any earlier rating by the same member.
    Rate {
        /// Book id.
        book: u64,
        /// Member id.
        member: u64,
        /// Readability score from 1 to 5.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        readability: u8,
        /// Content score from 1 to 5.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        content: u8,
        /// Free-form comment.
        #[arg(long)]
        comment: Option<String>,
    },
    /// Delete a member's rating of a book.
    Unrate {
        /// Book id.
        book: u64,
        /// Member id.
        member: u64,
    },
    /// List the ratings of one book or by one member.
    Ratings {
        /// Ratings of this book.
        #[arg(long, conflicts_with = "member", required_unless_present = "member")]
        book: Option<u64>,
        /// Ratings by this member.
        #[arg(long)]
        member: Option<u64>,
    },
    /// Print mean scores for one or more books.
    Averages {
        /// Book ids.
        #[arg(required = true)]
        books: Vec<u64>,
    },
}

/// Book status accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// WISHLIST.
    Wishlist,
    /// NEXT.
    Next,
    /// CURRENT.
    Current,
    /// COMPLETED.
    Completed,
}

impl From<StatusArg> for BookStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Wishlist => Self::Wishlist,
            StatusArg::Next => Self::Next,
            StatusArg::Current => Self::Current,
            StatusArg::Completed => Self::Completed,
        }
    }
}

pub(crate) const fn member(raw: u64) -> MemberId {
    MemberId::new(raw)
}

pub(crate) const fn book(raw: u64) -> BookId {
    BookId::new(raw)
}
