//! Port bundle the command-line adapter dispatches into.
//!
//! Commands only see driving ports, so they can be tested against mocks
//! without touching storage.

use std::sync::Arc;

use crate::domain::ClubServices;
use crate::domain::ports::{
    ClubStateRepository, LifecycleCommand, LifecycleQuery, QueueCommand, QueueQuery,
    QuorumCommand, QuorumQuery, RatingCommand, RatingQuery, RosterCommand, RosterQuery,
};

/// Driving ports used by the command-line adapter.
#[derive(Clone)]
pub struct CliState {
    /// Queue mutations.
    pub queue: Arc<dyn QueueCommand>,
    /// Queue reads.
    pub queue_query: Arc<dyn QueueQuery>,
    /// Book lifecycle commands.
    pub lifecycle: Arc<dyn LifecycleCommand>,
    /// Current, next and past books.
    pub lifecycle_query: Arc<dyn LifecycleQuery>,
    /// Read marks and backfill.
    pub quorum: Arc<dyn QuorumCommand>,
    /// Read counts and quorum status.
    pub quorum_query: Arc<dyn QuorumQuery>,
    /// Member and book registration.
    pub roster: Arc<dyn RosterCommand>,
    /// Member and book listings.
    pub roster_query: Arc<dyn RosterQuery>,
    /// Rating changes.
    pub rating: Arc<dyn RatingCommand>,
    /// Rating lookups and averages.
    pub rating_query: Arc<dyn RatingQuery>,
}

impl<R> From<ClubServices<R>> for CliState
where
    R: ClubStateRepository + 'static,
{
    fn from(services: ClubServices<R>) -> Self {
        let queue = Arc::new(services.queue);
        let lifecycle = Arc::new(services.lifecycle);
        let quorum = Arc::new(services.quorum);
        let roster = Arc::new(services.roster);
        let rating = Arc::new(services.rating);
        Self {
            queue: Arc::clone(&queue) as Arc<dyn QueueCommand>,
            queue_query: queue,
            lifecycle: Arc::clone(&lifecycle) as Arc<dyn LifecycleCommand>,
            lifecycle_query: lifecycle,
            quorum: Arc::clone(&quorum) as Arc<dyn QuorumCommand>,
            quorum_query: quorum,
            roster: Arc::clone(&roster) as Arc<dyn RosterCommand>,
            roster_query: roster,
            rating: Arc::clone(&rating) as Arc<dyn RatingCommand>,
            rating_query: rating,
        }
    }
}
