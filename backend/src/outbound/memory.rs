//! In-memory club state repository.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ClubState;
use crate::domain::ports::{ClubStateRepository, ClubStateRepositoryError};

/// Club state held in process memory.
///
/// Clones share the same state, so a test can hand one clone to the services
/// and inspect another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClubStateRepository {
    state: Arc<RwLock<ClubState>>,
}

impl InMemoryClubStateRepository {
    /// Start from `state` instead of an empty club.
    pub fn with_state(state: ClubState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Copy of the committed state.
    pub async fn snapshot(&self) -> ClubState {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl ClubStateRepository for InMemoryClubStateRepository {
    async fn load(&self) -> Result<ClubState, ClubStateRepositoryError> {
        Ok(self.state.read().await.clone())
    }

    async fn save(
        &self,
        state: &ClubState,
        expected_revision: u64,
    ) -> Result<(), ClubStateRepositoryError> {
        let mut stored = self.state.write().await;
        if stored.revision() != expected_revision {
            debug!(
                expected_revision,
                actual_revision = stored.revision(),
                "rejected stale in-memory save"
            );
            return Err(ClubStateRepositoryError::revision_mismatch(
                expected_revision,
                stored.revision(),
            ));
        }
        *stored = state.clone();
        debug!(revision = state.revision(), "committed in-memory club state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Revision checks for the in-memory adapter.

    use super::*;

    #[tokio::test]
    async fn fresh_repository_loads_revision_zero() {
        let repository = InMemoryClubStateRepository::default();
        let state = repository.load().await.expect("load");
        assert_eq!(state.revision(), 0);
    }

    #[tokio::test]
    async fn save_replaces_state_when_revision_matches() {
        let repository = InMemoryClubStateRepository::default();
        let mut state = repository.load().await.expect("load");
        state.bump_revision();
        repository.save(&state, 0).await.expect("save");
        assert_eq!(repository.snapshot().await.revision(), 1);
    }

    #[tokio::test]
    async fn stale_save_is_rejected_and_keeps_state() {
        let repository = InMemoryClubStateRepository::default();
        let mut first = repository.load().await.expect("load");
        let mut second = first.clone();
        first.bump_revision();
        second.bump_revision();
        repository.save(&first, 0).await.expect("first save");

        let err = repository
            .save(&second, 0)
            .await
            .expect_err("second writer is stale");
        assert_eq!(err, ClubStateRepositoryError::revision_mismatch(0_u64, 1_u64));
        assert_eq!(repository.snapshot().await.revision(), 1);
    }
}
