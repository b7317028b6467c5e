//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of the club state repository port:
//!
//! - **memory**: process-local store for tests and ephemeral runs
//! - **snapshot**: JSON snapshot file written atomically through `cap_std`
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod snapshot;

pub use memory::InMemoryClubStateRepository;
pub use snapshot::{DEFAULT_STATE_FILE, JsonFileClubStateRepository};
