//! JSON snapshot repository.
//!
//! The whole club lives in one pretty-printed JSON document inside a state
//! directory. Writes go through [`atomic_io::write_atomic`], so a crash
//! leaves either the previous snapshot or the new one. Filesystem access is
//! scoped to the state directory with `cap_std`.
//!
//! Every load and save holds an advisory `fs2` lock on a sibling
//! `.<file>.lock` file: shared for loads, exclusive for saves. The revision
//! read, the comparison and the rename therefore happen as one step even
//! when several `bookclub` processes share the directory.

mod atomic_io;

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use fs2::FileExt;
use tracing::debug;

use crate::domain::ClubState;
use crate::domain::ports::{ClubStateRepository, ClubStateRepositoryError};

/// Snapshot file name used when none is configured.
pub const DEFAULT_STATE_FILE: &str = "club.json";

/// Club state persisted as a JSON snapshot file.
#[derive(Debug, Clone)]
pub struct JsonFileClubStateRepository {
    dir: Arc<Dir>,
    file_name: String,
    lock_name: String,
    path: Utf8PathBuf,
}

/// Which kind of advisory lock to take on the lock file.
#[derive(Debug, Clone, Copy)]
enum LockMode {
    Shared,
    Exclusive,
}

impl JsonFileClubStateRepository {
    /// Open `file_name` inside `state_dir`, creating the directory if needed.
    ///
    /// The snapshot itself is created on the first save.
    ///
    /// # Errors
    ///
    /// Returns [`ClubStateRepositoryError::Connection`] when the directory
    /// cannot be created or opened, or when `file_name` is not a bare file
    /// name.
    pub fn open(state_dir: &Utf8Path, file_name: &str) -> Result<Self, ClubStateRepositoryError> {
        let mut components = Utf8Path::new(file_name).components();
        let (Some(Utf8Component::Normal(name)), None) = (components.next(), components.next())
        else {
            return Err(ClubStateRepositoryError::connection(format!(
                "state file {file_name:?} must be a plain file name"
            )));
        };
        let connection_error = |err: io::Error| {
            ClubStateRepositoryError::connection(format!("state directory {state_dir}: {err}"))
        };
        Dir::create_ambient_dir_all(state_dir, ambient_authority()).map_err(connection_error)?;
        let dir = Dir::open_ambient_dir(state_dir, ambient_authority()).map_err(connection_error)?;
        Ok(Self {
            dir: Arc::new(dir),
            file_name: name.to_owned(),
            lock_name: format!(".{name}.lock"),
            path: state_dir.join(name),
        })
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Open the lock file and block until `mode` is granted.
    ///
    /// The lock is released when the returned file is dropped.
    fn lock(&self, mode: LockMode) -> Result<std::fs::File, ClubStateRepositoryError> {
        let lock_error = |err: io::Error| {
            ClubStateRepositoryError::storage(format!("lock {}: {err}", self.path))
        };
        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true).truncate(false);
        let file = self
            .dir
            .open_with(&self.lock_name, &options)
            .map_err(lock_error)?
            .into_std();
        let locked = match mode {
            LockMode::Shared => FileExt::lock_shared(&file),
            LockMode::Exclusive => FileExt::lock_exclusive(&file),
        };
        locked.map_err(lock_error)?;
        Ok(file)
    }

    fn load_locked(&self) -> Result<ClubState, ClubStateRepositoryError> {
        let _lock = self.lock(LockMode::Shared)?;
        self.read_state()
    }

    fn save_locked(
        &self,
        state: &ClubState,
        expected_revision: u64,
    ) -> Result<(), ClubStateRepositoryError> {
        let _lock = self.lock(LockMode::Exclusive)?;
        self.write_state(state, expected_revision)
    }

    fn read_state(&self) -> Result<ClubState, ClubStateRepositoryError> {
        let contents = match self.dir.read_to_string(&self.file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path, "no snapshot yet; starting empty club");
                return Ok(ClubState::default());
            }
            Err(err) => {
                return Err(ClubStateRepositoryError::storage(format!(
                    "read {}: {err}",
                    self.path
                )));
            }
        };
        serde_json::from_str(&contents).map_err(|err| {
            ClubStateRepositoryError::corrupt(format!("{}: {err}", self.path))
        })
    }

    fn write_state(
        &self,
        state: &ClubState,
        expected_revision: u64,
    ) -> Result<(), ClubStateRepositoryError> {
        let stored = self.read_state()?.revision();
        if stored != expected_revision {
            debug!(
                path = %self.path,
                expected = expected_revision,
                actual = stored,
                "snapshot revision moved on; rejecting save"
            );
            return Err(ClubStateRepositoryError::revision_mismatch(
                expected_revision,
                stored,
            ));
        }
        let mut contents = serde_json::to_vec_pretty(state).map_err(|err| {
            ClubStateRepositoryError::storage(format!("encode club state: {err}"))
        })?;
        contents.push(b'\n');
        atomic_io::write_atomic(&self.dir, &self.file_name, &contents).map_err(|err| {
            ClubStateRepositoryError::storage(format!("write {}: {err}", self.path))
        })?;
        debug!(path = %self.path, revision = state.revision(), "saved club snapshot");
        Ok(())
    }
}

fn join_error(err: tokio::task::JoinError) -> ClubStateRepositoryError {
    ClubStateRepositoryError::storage(format!("snapshot task failed: {err}"))
}

#[async_trait]
impl ClubStateRepository for JsonFileClubStateRepository {
    async fn load(&self) -> Result<ClubState, ClubStateRepositoryError> {
        let repository = self.clone();
        tokio::task::spawn_blocking(move || repository.load_locked())
            .await
            .map_err(join_error)?
    }

    async fn save(
        &self,
        state: &ClubState,
        expected_revision: u64,
    ) -> Result<(), ClubStateRepositoryError> {
        let repository = self.clone();
        let state = state.clone();
        tokio::task::spawn_blocking(move || repository.save_locked(&state, expected_revision))
            .await
            .map_err(join_error)?
    }
}
