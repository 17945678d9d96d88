//! Half-day resolution on the calendar timeline.
//!
//! Every absence boundary is a calendar date plus a [`Half`]. A [`HalfDay`] is
//! that pair as a single totally-ordered point: `2000-01-01 AM` < `2000-01-01 PM`
//! < `2000-01-02 AM`. All boundary comparisons in [`crate::interval`] go through
//! this ordering.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AbsenceError, Result};

/// Which half of a day an interval boundary falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Half {
    #[serde(rename = "AM", alias = "am")]
    Am,
    #[serde(rename = "PM", alias = "pm")]
    Pm,
}

impl Half {
    pub fn as_str(self) -> &'static str {
        match self {
            Half::Am => "AM",
            Half::Pm => "PM",
        }
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Half {
    type Err = AbsenceError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("AM") {
            Ok(Half::Am)
        } else if trimmed.eq_ignore_ascii_case("PM") {
            Ok(Half::Pm)
        } else {
            Err(AbsenceError::InvalidHalf(s.to_string()))
        }
    }
}

/// A single half-day on the calendar: a date and the half of it.
///
/// Ordered by date first, then by half (AM before PM).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HalfDay {
    pub date: NaiveDate,
    pub half: Half,
}

impl HalfDay {
    pub fn new(date: NaiveDate, half: Half) -> Self {
        Self { date, half }
    }

    /// The half-day immediately after this one, or `None` past the last
    /// representable date.
    pub fn next(self) -> Option<HalfDay> {
        match self.half {
            Half::Am => Some(HalfDay::new(self.date, Half::Pm)),
            Half::Pm => self.date.succ_opt().map(|d| HalfDay::new(d, Half::Am)),
        }
    }

    /// The half-day immediately before this one.
    pub fn prev(self) -> Option<HalfDay> {
        match self.half {
            Half::Pm => Some(HalfDay::new(self.date, Half::Am)),
            Half::Am => self.date.pred_opt().map(|d| HalfDay::new(d, Half::Pm)),
        }
    }

    /// Position on a linear half-day scale. Consecutive half-days differ by 1.
    pub fn ordinal(self) -> i64 {
        let day = i64::from(self.date.num_days_from_ce());
        day * 2 + i64::from(self.half == Half::Pm)
    }
}

impl fmt::Display for HalfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn am_orders_before_pm_on_same_day() {
        let am = HalfDay::new(date(2000, 1, 1), Half::Am);
        let pm = HalfDay::new(date(2000, 1, 1), Half::Pm);
        assert!(am < pm);
        assert!(pm < HalfDay::new(date(2000, 1, 2), Half::Am));
    }

    #[test]
    fn next_and_prev_step_one_half_day() {
        let pm = HalfDay::new(date(2000, 1, 31), Half::Pm);
        let next = pm.next().unwrap();
        assert_eq!(next, HalfDay::new(date(2000, 2, 1), Half::Am));
        assert_eq!(next.prev(), Some(pm));
        assert_eq!(next.ordinal() - pm.ordinal(), 1);
    }

    #[test]
    fn parses_meridiem_case_insensitively() {
        assert_eq!(" am ".parse::<Half>().unwrap(), Half::Am);
        assert_eq!("PM".parse::<Half>().unwrap(), Half::Pm);
        assert_eq!(
            "noon".parse::<Half>(),
            Err(AbsenceError::InvalidHalf("noon".to_string()))
        );
    }
}
