//! Member and book registration service.
//!
//! Registering a member queues them at the back. Deactivating a member
//! takes them out of the queue and reactivating appends them again, keeping
//! the active members and the queue in step.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    BookFilter, ClubStateRepository, NewBook, RosterCommand, RosterQuery,
};
use crate::domain::{
    Book, ClubUnitOfWork, Error, Member, MemberDirectory, MemberId, map_rotation_error,
};

/// Roster service implementing [`RosterCommand`] and [`RosterQuery`].
#[derive(Clone)]
pub struct RosterService<R> {
    unit_of_work: ClubUnitOfWork<R>,
}

impl<R> RosterService<R> {
    /// Create a roster service over a shared unit of work.
    pub fn new(unit_of_work: ClubUnitOfWork<R>) -> Self {
        Self { unit_of_work }
    }
}

#[async_trait]
impl<R> RosterCommand for RosterService<R>
where
    R: ClubStateRepository,
{
    async fn register_member(&self, name: String) -> Result<Member, Error> {
        self.unit_of_work
            .write(move |state, _| {
                let member = Member::try_new(state.roster().next_id(), &name)?;
                if state.roster().find_by_name(member.name()).is_some() {
                    return Err(Error::conflict(format!(
                        "a member named {:?} already exists",
                        member.name()
                    ))
                    .with_details(json!({ "name": member.name() })));
                }
                state.roster.insert(member.clone())?;
                state.queue.append(member.id());
                Ok(member)
            })
            .await
    }

    async fn set_member_active(&self, member: MemberId, active: bool) -> Result<Member, Error> {
        self.unit_of_work
            .write(move |state, _| {
                let entry = state.roster.find_member_mut(member)?;
                entry.set_active(active);
                let updated = entry.clone();
                if active {
                    state.queue.append(member);
                } else if state.queue.contains(&member) {
                    state
                        .queue
                        .remove(&member)
                        .map_err(|err| map_rotation_error(err, "set_member_active", Some(member)))?;
                }
                Ok(updated)
            })
            .await
    }

    async fn add_book(&self, book: NewBook) -> Result<Book, Error> {
        self.unit_of_work
            .write(move |state, _| {
                state.roster().find_member(book.owner)?;
                let created =
                    Book::try_new(state.shelf().next_id(), book.owner, &book.title, &book.author)?;
                state.shelf.insert(created.clone())?;
                Ok(created)
            })
            .await
    }
}

#[async_trait]
impl<R> RosterQuery for RosterService<R>
where
    R: ClubStateRepository,
{
    async fn list_members(&self) -> Result<Vec<Member>, Error> {
        self.unit_of_work
            .read(|state| Ok(state.roster().iter().cloned().collect()))
            .await
    }

    async fn find_member(&self, member: MemberId) -> Result<Member, Error> {
        self.unit_of_work
            .read(move |state| state.roster().find_member(member).cloned())
            .await
    }

    async fn list_books(&self, filter: BookFilter) -> Result<Vec<Book>, Error> {
        self.unit_of_work
            .read(move |state| {
                Ok(state
                    .shelf()
                    .iter()
                    .filter(|book| filter.matches(book))
                    .cloned()
                    .collect())
            })
            .await
    }
}
