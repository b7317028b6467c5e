//! Runtime configuration loaded via OrthoConfig.
//!
//! Values come from `BOOKCLUB_*` environment variables and configuration
//! files; command-line flags parsed by the binary take precedence.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::DEFAULT_STATE_FILE;

const DEFAULT_STATE_DIR: &str = ".bookclub";

/// Configuration for the bookclub binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKCLUB")]
pub struct ClubSettings {
    /// Directory holding the club snapshot.
    pub state_dir: Option<PathBuf>,
    /// Snapshot file name inside the state directory.
    pub state_file: Option<String>,
    /// Emit logs as JSON lines instead of human-readable text.
    #[ortho_config(default = true)]
    pub json_logs: bool,
}

impl ClubSettings {
    /// Return the configured state directory, falling back to `.bookclub`.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
    }

    /// Return the configured snapshot file name, falling back to
    /// `club.json`.
    pub fn state_file(&self) -> &str {
        self.state_file.as_deref().unwrap_or(DEFAULT_STATE_FILE)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ClubSettings {
        ClubSettings::load_from_iter([OsString::from("bookclub")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("BOOKCLUB_STATE_DIR", None::<String>),
            ("BOOKCLUB_STATE_FILE", None::<String>),
            ("BOOKCLUB_JSON_LOGS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.state_dir(), PathBuf::from(".bookclub"));
        assert_eq!(settings.state_file(), "club.json");
        assert!(settings.json_logs);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("BOOKCLUB_STATE_DIR", Some("/tmp/club-state".to_owned())),
            ("BOOKCLUB_STATE_FILE", Some("reading.json".to_owned())),
            ("BOOKCLUB_JSON_LOGS", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.state_dir(), PathBuf::from("/tmp/club-state"));
        assert_eq!(settings.state_file(), "reading.json");
        assert!(!settings.json_logs);
    }
}
