//! Port for club state persistence.
//!
//! The [`ClubStateRepository`] trait stores the whole [`ClubState`]
//! aggregate as one unit. Adapters must apply a save atomically and reject
//! it when another writer committed first.

use async_trait::async_trait;

use crate::domain::ClubState;

use super::define_port_error;

define_port_error! {
    /// Errors raised by club state repository adapters.
    pub enum ClubStateRepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "club state store unavailable: {message}",
        /// Reading or writing the store failed.
        Storage { message: String } =>
            "club state storage failed: {message}",
        /// Stored state could not be decoded or breaks an invariant.
        Corrupt { message: String } =>
            "club state is corrupt: {message}",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u64, actual: u64 } =>
            "revision mismatch: expected {expected}, found {actual}",
    }
}

/// Port for loading and saving the club aggregate.
///
/// # Revision Semantics
///
/// - A club that was never saved loads as an empty state at revision `0`.
/// - Callers bump the revision on the state before saving it and pass the
///   revision they loaded as `expected_revision`.
/// - A save whose `expected_revision` differs from the stored revision fails
///   with [`ClubStateRepositoryError::RevisionMismatch`] and changes nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClubStateRepository: Send + Sync {
    /// Load the latest committed state.
    async fn load(&self) -> Result<ClubState, ClubStateRepositoryError>;

    /// Replace the stored state if its revision still equals
    /// `expected_revision`.
    async fn save(
        &self,
        state: &ClubState,
        expected_revision: u64,
    ) -> Result<(), ClubStateRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
///
/// Lookups return an empty club and saves are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureClubStateRepository;

#[async_trait]
impl ClubStateRepository for FixtureClubStateRepository {
    async fn load(&self) -> Result<ClubState, ClubStateRepositoryError> {
        Ok(ClubState::default())
    }

    async fn save(
        &self,
        _state: &ClubState,
        _expected_revision: u64,
    ) -> Result<(), ClubStateRepositoryError> {
        Ok(())
    }
}
