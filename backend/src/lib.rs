//! Book club turn rotation and reading lifecycle library.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use settings::ClubSettings;
