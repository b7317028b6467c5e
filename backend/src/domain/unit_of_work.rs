//! Transactional access to the club aggregate.
//!
//! Every driving operation loads the whole [`ClubState`], applies its change
//! and saves the result under an optimistic revision check. Writers within
//! one process queue on a shared gate so they never race each other; the
//! revision check catches writers in other processes.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use serde_json::json;
use tokio::sync::Mutex;

use super::ports::{ClubStateRepository, ClubStateRepositoryError};
use super::{ClubState, Error};

pub(crate) fn map_repository_error(error: ClubStateRepositoryError) -> Error {
    match error {
        ClubStateRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("club state repository unavailable: {message}"))
        }
        ClubStateRepositoryError::Storage { message } => {
            Error::internal(format!("club state repository error: {message}"))
        }
        ClubStateRepositoryError::Corrupt { message } => {
            Error::internal(format!("stored club state is corrupt: {message}"))
        }
        ClubStateRepositoryError::RevisionMismatch { expected, actual } => Error::conflict(
            "club state changed concurrently; reload and retry",
        )
        .with_details(json!({
            "code": "revision_mismatch",
            "expectedRevision": expected,
            "actualRevision": actual,
        })),
    }
}

/// Shared load-mutate-save runner used by every service.
pub struct ClubUnitOfWork<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    write_gate: Arc<Mutex<()>>,
}

impl<R> Clone for ClubUnitOfWork<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            write_gate: Arc::clone(&self.write_gate),
        }
    }
}

impl<R: ClubStateRepository> ClubUnitOfWork<R> {
    /// Create a unit of work over `repository`, stamping dates from `clock`.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Today's date in UTC.
    pub fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    /// Run `f` against the latest committed state without saving.
    pub async fn read<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&ClubState) -> Result<T, Error> + Send,
    {
        let state = self
            .repository
            .load()
            .await
            .map_err(map_repository_error)?;
        f(&state)
    }

    /// Run `f` against the latest state and commit the result.
    ///
    /// Nothing is saved when `f` fails or leaves the state breaking an
    /// invariant, so a failed operation has no visible effect.
    pub async fn write<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut ClubState, NaiveDate) -> Result<T, Error> + Send,
        T: Send,
    {
        let _guard = self.write_gate.lock().await;
        let mut state = self
            .repository
            .load()
            .await
            .map_err(map_repository_error)?;
        let expected_revision = state.revision();
        let value = f(&mut state, self.today())?;
        state.check_invariants()?;
        state.bump_revision();
        self.repository
            .save(&state, expected_revision)
            .await
            .map_err(map_repository_error)?;
        Ok(value)
    }
}
