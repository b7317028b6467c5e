//! Turn-queue domain service.
//!
//! Implements the queue driving ports over the club unit of work.

use async_trait::async_trait;

use crate::domain::ports::{ClubStateRepository, QueueCommand, QueueQuery};
use crate::domain::{
    ClubUnitOfWork, Error, MemberId, QueueEntry, RotationEngine, current_entry, next_entry,
    queue_entries,
};

/// Queue service implementing [`QueueCommand`] and [`QueueQuery`].
#[derive(Clone)]
pub struct QueueService<R> {
    unit_of_work: ClubUnitOfWork<R>,
}

impl<R> QueueService<R> {
    /// Create a queue service over a shared unit of work.
    pub fn new(unit_of_work: ClubUnitOfWork<R>) -> Self {
        Self { unit_of_work }
    }
}

#[async_trait]
impl<R> QueueCommand for QueueService<R>
where
    R: ClubStateRepository,
{
    async fn add_member_to_queue(&self, member: MemberId) -> Result<bool, Error> {
        self.unit_of_work
            .write(move |state, _| {
                RotationEngine::new(&mut state.queue, &state.roster).add_member(member)
            })
            .await
    }

    async fn remove_member_from_queue(&self, member: MemberId) -> Result<QueueEntry, Error> {
        self.unit_of_work
            .write(move |state, _| {
                RotationEngine::new(&mut state.queue, &state.roster).remove_member(member)
            })
            .await
    }

    async fn move_member_to_position(
        &self,
        member: MemberId,
        position: usize,
    ) -> Result<Vec<QueueEntry>, Error> {
        self.unit_of_work
            .write(move |state, _| {
                RotationEngine::new(&mut state.queue, &state.roster)
                    .move_to_position(member, position)?;
                Ok(queue_entries(&state.queue))
            })
            .await
    }

    async fn rotate_queue(&self) -> Result<Vec<QueueEntry>, Error> {
        self.rotate_queue_by_positions(1).await
    }

    async fn rotate_queue_by_positions(&self, positions: i64) -> Result<Vec<QueueEntry>, Error> {
        self.unit_of_work
            .write(move |state, _| {
                RotationEngine::new(&mut state.queue, &state.roster).rotate_by(positions);
                Ok(queue_entries(&state.queue))
            })
            .await
    }

    async fn rotate_to_member(&self, member: MemberId) -> Result<Vec<QueueEntry>, Error> {
        self.unit_of_work
            .write(move |state, _| {
                RotationEngine::new(&mut state.queue, &state.roster).rotate_to_member(member)?;
                Ok(queue_entries(&state.queue))
            })
            .await
    }
}

#[async_trait]
impl<R> QueueQuery for QueueService<R>
where
    R: ClubStateRepository,
{
    async fn get_queue(&self) -> Result<Vec<QueueEntry>, Error> {
        self.unit_of_work
            .read(|state| Ok(queue_entries(state.queue())))
            .await
    }

    async fn get_current_member(&self) -> Result<QueueEntry, Error> {
        self.unit_of_work
            .read(|state| current_entry(state.queue()))
            .await
    }

    async fn get_next_member(&self) -> Result<QueueEntry, Error> {
        self.unit_of_work
            .read(|state| next_entry(state.queue()))
            .await
    }
}
