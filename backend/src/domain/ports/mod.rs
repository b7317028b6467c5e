//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`ClubStateRepository`]) are implemented by outbound
//! adapters. Driving ports (the `*Command` and `*Query` traits) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod club_state_repository;
mod lifecycle_command;
mod lifecycle_query;
mod queue_command;
mod queue_query;
mod quorum_command;
mod quorum_query;
mod rating_command;
mod rating_query;
mod roster_command;
mod roster_query;

#[cfg(test)]
pub use club_state_repository::MockClubStateRepository;
pub use club_state_repository::{
    ClubStateRepository, ClubStateRepositoryError, FixtureClubStateRepository,
};
#[cfg(test)]
pub use lifecycle_command::MockLifecycleCommand;
pub use lifecycle_command::{LifecycleCommand, ReplacementOutcome};
#[cfg(test)]
pub use lifecycle_query::MockLifecycleQuery;
pub use lifecycle_query::LifecycleQuery;
#[cfg(test)]
pub use queue_command::MockQueueCommand;
pub use queue_command::QueueCommand;
#[cfg(test)]
pub use queue_query::MockQueueQuery;
pub use queue_query::QueueQuery;
#[cfg(test)]
pub use quorum_command::MockQuorumCommand;
pub use quorum_command::{BackfillReport, QuorumCommand};
#[cfg(test)]
pub use quorum_query::MockQuorumQuery;
pub use quorum_query::{QuorumQuery, QuorumStatus};
#[cfg(test)]
pub use rating_command::MockRatingCommand;
pub use rating_command::RatingCommand;
#[cfg(test)]
pub use rating_query::MockRatingQuery;
pub use rating_query::RatingQuery;
#[cfg(test)]
pub use roster_command::MockRosterCommand;
pub use roster_command::{NewBook, RosterCommand};
#[cfg(test)]
pub use roster_query::MockRosterQuery;
pub use roster_query::{BookFilter, RosterQuery};
