//! Book club domain: members, books, the turn queue and the rules that bind
//! them.
//!
//! Purpose: Model the club aggregate and the operations on it without any
//! knowledge of storage or user interface. Outbound adapters implement the
//! driven port [`ports::ClubStateRepository`]; inbound adapters call the
//! driving ports implemented by the services re-exported here.
//!
//! Public surface:
//! - Error and ErrorCode: stable failure payload shared by every operation.
//! - Member, Book, ClubState: the aggregate and its entities.
//! - RotationEngine, BookLifecycle, TurnCoordinator: the rules.
//! - Rating, RatingLedger: member scores for books.
//! - QueueService, LifecycleService, QuorumService, RosterService,
//!   RatingService: driving port implementations bundled by ClubServices.

pub mod book;
pub mod club;
pub mod club_services;
pub mod completion_gate;
pub mod directory;
pub mod error;
pub mod lifecycle;
pub mod lifecycle_service;
pub mod member;
pub mod ports;
pub mod queue_service;
pub mod quorum;
pub mod quorum_service;
pub mod rating;
pub mod rating_service;
pub mod roster_service;
pub mod rotation_engine;
pub mod turn_coordinator;
pub mod unit_of_work;

#[cfg(test)]
pub(crate) mod service_fixtures;

pub use self::book::{Book, BookId, BookStatus};
pub use self::club::ClubState;
pub use self::club_services::ClubServices;
pub use self::completion_gate::{Actor, check_completion_gate};
pub use self::directory::{BookDirectory, MemberDirectory, Roster, Shelf};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::lifecycle::{BookLifecycle, RECENT_COMPLETIONS, recently_completed};
pub use self::lifecycle_service::LifecycleService;
pub use self::member::{Member, MemberId};
pub use self::queue_service::QueueService;
pub use self::quorum::{CompletionQuorum, CompletionRecord, QuorumThreshold};
pub use self::quorum_service::QuorumService;
pub use self::rating::{
    MAX_COMMENT_CHARS, Rating, RatingAverages, RatingInput, RatingLedger, Score,
};
pub use self::rating_service::RatingService;
pub use self::roster_service::RosterService;
pub(crate) use self::rotation_engine::map_rotation_error;
pub use self::rotation_engine::{
    QueueEntry, RotationEngine, current_entry, next_entry, queue_entries,
};
pub use self::turn_coordinator::{
    CompletionOutcome, SkipOutcome, TurnCoordinator, WishlistCandidate,
    next_member_with_wishlist_books,
};
pub use self::unit_of_work::ClubUnitOfWork;
