//! The closed set of leave kinds an interval can carry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AbsenceError, Result};

/// Kind of absence. Intervals of different kinds never merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveKind {
    Holiday,
    Sickness,
    Parental,
    Compassionate,
    Unpaid,
    OtherLeave,
}

impl LeaveKind {
    pub const ALL: [LeaveKind; 6] = [
        LeaveKind::Holiday,
        LeaveKind::Sickness,
        LeaveKind::Parental,
        LeaveKind::Compassionate,
        LeaveKind::Unpaid,
        LeaveKind::OtherLeave,
    ];

    /// Canonical snake_case name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            LeaveKind::Holiday => "holiday",
            LeaveKind::Sickness => "sickness",
            LeaveKind::Parental => "parental",
            LeaveKind::Compassionate => "compassionate",
            LeaveKind::Unpaid => "unpaid",
            LeaveKind::OtherLeave => "other_leave",
        }
    }
}

impl fmt::Display for LeaveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveKind {
    type Err = AbsenceError;

    /// Accepts the canonical name in any case, with `-` or spaces in place of `_`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        LeaveKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| AbsenceError::InvalidKind(s.to_string()))
    }
}
