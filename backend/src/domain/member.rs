//! Club members.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Error;

/// Stable member identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(u64);

impl MemberId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A participant in the reading rotation.
///
/// `total_picks` counts completed turns and `last_pick_date` records when the
/// most recent one finished. Both change only when the member's current book
/// is completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    id: MemberId,
    name: String,
    active: bool,
    #[serde(default)]
    last_pick_date: Option<NaiveDate>,
    #[serde(default)]
    total_picks: u32,
}

impl Member {
    /// Create an active member with no completed turns.
    ///
    /// The name is trimmed and must not be empty.
    pub fn try_new(id: MemberId, name: &str) -> Result<Self, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_request("member name must not be empty"));
        }
        Ok(Self {
            id,
            name: name.to_owned(),
            active: true,
            last_pick_date: None,
            total_picks: 0,
        })
    }

    /// Member identifier.
    pub fn id(&self) -> MemberId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the member takes part in the rotation.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Date the member's last book was completed.
    pub fn last_pick_date(&self) -> Option<NaiveDate> {
        self.last_pick_date
    }

    /// Number of completed turns.
    pub fn total_picks(&self) -> u32 {
        self.total_picks
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn record_pick(&mut self, on: NaiveDate) {
        self.last_pick_date = Some(on);
        self.total_picks = self.total_picks.saturating_add(1);
    }
}
