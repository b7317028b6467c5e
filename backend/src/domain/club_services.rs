//! Wiring for the club's domain services.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::ClubStateRepository;
use crate::domain::{
    ClubUnitOfWork, LifecycleService, QueueService, QuorumService, RatingService, RosterService,
};

/// Every driving-port implementation, sharing one unit of work.
///
/// Sharing the unit of work means all services queue on the same write
/// gate, so commands issued through different services never interleave.
#[derive(Clone)]
pub struct ClubServices<R> {
    /// Queue commands and queries.
    pub queue: QueueService<R>,
    /// Lifecycle commands and queries.
    pub lifecycle: LifecycleService<R>,
    /// Read marks and quorum queries.
    pub quorum: QuorumService<R>,
    /// Member and book registration.
    pub roster: RosterService<R>,
    /// Member ratings.
    pub rating: RatingService<R>,
}

impl<R: ClubStateRepository> ClubServices<R> {
    /// Build the services over `repository`, dating changes with `clock`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use bookclub::domain::ClubServices;
    /// use bookclub::domain::ports::FixtureClubStateRepository;
    /// use mockable::DefaultClock;
    ///
    /// let services = ClubServices::new(
    ///     Arc::new(FixtureClubStateRepository),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = services;
    /// ```
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        let unit_of_work = ClubUnitOfWork::new(repository, clock);
        Self {
            queue: QueueService::new(unit_of_work.clone()),
            lifecycle: LifecycleService::new(unit_of_work.clone()),
            quorum: QuorumService::new(unit_of_work.clone()),
            roster: RosterService::new(unit_of_work.clone()),
            rating: RatingService::new(unit_of_work),
        }
    }
}
