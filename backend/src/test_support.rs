//! Test utilities for the bookclub crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Integration tests reach it through the `test-support` feature.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use tempfile::TempDir;

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    /// Pin the clock to noon UTC on `date`.
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default();
        Self {
            utc_now: Utc.from_utc_datetime(&noon),
        }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// The date every fixture clock reports unless a test picks another.
pub fn fixture_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap_or_default()
}

/// Clock pinned to [`fixture_date`].
pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock::on(fixture_date()))
}

/// Temporary state directory removed when the guard drops.
///
/// # Examples
///
/// ```rust
/// use bookclub::test_support::temp_state_dir;
///
/// let (guard, path) = temp_state_dir()?;
/// assert!(path.as_std_path().is_dir());
/// drop(guard);
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn temp_state_dir() -> io::Result<(TempDir, Utf8PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .map_err(|path| io::Error::other(format!("non UTF-8 temp dir: {}", path.display())))?;
    Ok((dir, path))
}
