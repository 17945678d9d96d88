//! A single contiguous absence with half-day resolution at both ends.
//!
//! An [`Interval`] covers every half-day from its start to its end, inclusive.
//! `2000-01-01 AM .. 2000-01-01 PM` is one whole day; `2000-01-01 PM ..
//! 2000-01-01 PM` is a single afternoon. Two intervals relate to each other in
//! exactly one way (see [`Relation`]), which drives mergeability.

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AbsenceError, Result};
use crate::half_day::{Half, HalfDay};
use crate::kind::LeaveKind;

/// How one interval's span relates to another's, ignoring kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Self contains other, boundaries included. Equal spans report `Covers`.
    Covers,
    /// Other contains self.
    CoveredBy,
    /// The spans share at least one half-day but neither contains the other.
    Overlaps,
    /// No shared half-day, and one ends exactly one half-day before the other starts.
    Adjacent,
    /// At least one whole half-day lies between the two spans.
    Disjoint,
}

/// An immutable absence interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    kind: LeaveKind,
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_half: Half,
    end_half: Half,
}

/// Unvalidated wire form; deserialization goes through [`Interval::with_halves`].
#[derive(Deserialize)]
struct RawInterval {
    kind: LeaveKind,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(default = "default_start_half")]
    start_half: Half,
    #[serde(default = "default_end_half")]
    end_half: Half,
}

fn default_start_half() -> Half {
    Half::Am
}

fn default_end_half() -> Half {
    Half::Pm
}

impl TryFrom<RawInterval> for Interval {
    type Error = AbsenceError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::with_halves(
            raw.kind,
            raw.start_date,
            raw.end_date,
            raw.start_half,
            raw.end_half,
        )
    }
}

impl Interval {
    /// Whole-day interval: starts in the morning of `start_date`, ends in the
    /// afternoon of `end_date`.
    ///
    /// # Errors
    /// Returns `AbsenceError::EndBeforeStart` if `end_date < start_date`.
    pub fn new(kind: LeaveKind, start_date: NaiveDate, end_date: NaiveDate) -> Result<Self> {
        Self::with_halves(kind, start_date, end_date, Half::Am, Half::Pm)
    }

    /// Interval with explicit half-day boundaries.
    ///
    /// # Errors
    /// Returns `AbsenceError::EndBeforeStart` if the end precedes the start,
    /// including the same-day `PM .. AM` case.
    pub fn with_halves(
        kind: LeaveKind,
        start_date: NaiveDate,
        end_date: NaiveDate,
        start_half: Half,
        end_half: Half,
    ) -> Result<Self> {
        let start = HalfDay::new(start_date, start_half);
        let end = HalfDay::new(end_date, end_half);
        if end < start {
            return Err(AbsenceError::EndBeforeStart {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self::spanning(kind, start, end))
    }

    /// Build an interval from loosely-typed input, as supplied by a source adapter.
    ///
    /// Dates are `YYYY-MM-DD`; halves are `AM`/`PM` and default to `AM` for the
    /// start and `PM` for the end.
    ///
    /// # Errors
    /// `InvalidKind`, `InvalidDate` or `InvalidHalf` for unparseable fields,
    /// `EndBeforeStart` when the parsed interval would be inverted.
    pub fn parse(
        kind: &str,
        start_date: &str,
        end_date: &str,
        start_half: Option<&str>,
        end_half: Option<&str>,
    ) -> Result<Self> {
        Self::parse_as(kind.parse()?, start_date, end_date, start_half, end_half)
    }

    /// [`parse`](Self::parse) with the kind already resolved.
    pub(crate) fn parse_as(
        kind: LeaveKind,
        start_date: &str,
        end_date: &str,
        start_half: Option<&str>,
        end_half: Option<&str>,
    ) -> Result<Self> {
        let start_half = start_half
            .map(str::parse::<Half>)
            .transpose()?
            .unwrap_or(Half::Am);
        let end_half = end_half
            .map(str::parse::<Half>)
            .transpose()?
            .unwrap_or(Half::Pm);
        Self::with_halves(
            kind,
            parse_date(start_date)?,
            parse_date(end_date)?,
            start_half,
            end_half,
        )
    }

    /// A one-half-day interval on `date`.
    pub fn single_half_day(kind: LeaveKind, date: NaiveDate, half: Half) -> Self {
        let point = HalfDay::new(date, half);
        Self::spanning(kind, point, point)
    }

    /// Caller guarantees `start <= end`.
    pub(crate) fn spanning(kind: LeaveKind, start: HalfDay, end: HalfDay) -> Self {
        debug_assert!(start <= end, "interval {start} .. {end} is inverted");
        Self {
            kind,
            start_date: start.date,
            end_date: end.date,
            start_half: start.half,
            end_half: end.half,
        }
    }

    pub fn kind(&self) -> LeaveKind {
        self.kind
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn start_half(&self) -> Half {
        self.start_half
    }

    pub fn end_half(&self) -> Half {
        self.end_half
    }

    /// First half-day covered.
    pub fn start(&self) -> HalfDay {
        HalfDay::new(self.start_date, self.start_half)
    }

    /// Last half-day covered.
    pub fn end(&self) -> HalfDay {
        HalfDay::new(self.end_date, self.end_half)
    }

    pub fn spans_single_day(&self) -> bool {
        self.start_date == self.end_date
    }

    /// True if the interval starts in an afternoon or ends in a morning.
    pub fn has_half_day_boundary(&self) -> bool {
        self.start_half == Half::Pm || self.end_half == Half::Am
    }

    /// Number of half-days covered, inclusive of both ends.
    pub fn half_days(&self) -> i64 {
        self.end().ordinal() - self.start().ordinal() + 1
    }

    pub fn matches_type(&self, other: &Interval) -> bool {
        self.kind == other.kind
    }

    /// Strictly earlier start. On the same date an AM start precedes a PM start.
    pub fn starts_before(&self, other: &Interval) -> bool {
        self.start() < other.start()
    }

    /// Strictly later end. On the same date a PM end follows an AM end.
    pub fn ends_after(&self, other: &Interval) -> bool {
        self.end() > other.end()
    }

    /// Self contains other's whole span, equal boundaries included.
    pub fn covers(&self, other: &Interval) -> bool {
        !other.starts_before(self) && !other.ends_after(self)
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.relation_to(other) == Relation::Overlaps
    }

    pub fn adjacent_to(&self, other: &Interval) -> bool {
        self.relation_to(other) == Relation::Adjacent
    }

    /// Same kind, and the spans touch or intersect.
    pub fn mergeable_with(&self, other: &Interval) -> bool {
        self.matches_type(other) && self.relation_to(other) != Relation::Disjoint
    }

    /// Classify the temporal relationship between the two spans.
    pub fn relation_to(&self, other: &Interval) -> Relation {
        if self.covers(other) {
            Relation::Covers
        } else if other.covers(self) {
            Relation::CoveredBy
        } else if self.start() <= other.end() && other.start() <= self.end() {
            Relation::Overlaps
        } else if self.end().next() == Some(other.start())
            || other.end().next() == Some(self.start())
        {
            Relation::Adjacent
        } else {
            Relation::Disjoint
        }
    }

    /// Merge two mergeable intervals into one spanning both.
    ///
    /// If either interval covers the other, the covering one is returned
    /// borrowed. Otherwise a new interval runs from the earlier start to the
    /// later end.
    ///
    /// # Errors
    /// Returns `AbsenceError::NotMergeable` if `!self.mergeable_with(other)`.
    pub fn merge_with<'a>(&'a self, other: &'a Interval) -> Result<Cow<'a, Interval>> {
        if !self.mergeable_with(other) {
            return Err(AbsenceError::NotMergeable {
                left: self.to_string(),
                right: other.to_string(),
            });
        }
        Ok(self.merged(other))
    }

    /// Caller guarantees mergeability.
    pub(crate) fn merged<'a>(&'a self, other: &'a Interval) -> Cow<'a, Interval> {
        if self.covers(other) {
            return Cow::Borrowed(self);
        }
        if other.covers(self) {
            return Cow::Borrowed(other);
        }
        let start = self.start().min(other.start());
        let end = self.end().max(other.end());
        Cow::Owned(Self::spanning(self.kind, start, end))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} .. {}", self.kind, self.start(), self.end())
    }
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| AbsenceError::InvalidDate(format!("'{}' ({})", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn display_shows_kind_and_boundaries() {
        let interval =
            Interval::new(LeaveKind::Holiday, date(2000, 1, 1), date(2000, 2, 1)).unwrap();
        assert_eq!(
            interval.to_string(),
            "holiday 2000-01-01 AM .. 2000-02-01 PM"
        );
    }

    #[test]
    fn half_days_counts_inclusive_span() {
        let whole =
            Interval::new(LeaveKind::Sickness, date(2000, 1, 1), date(2000, 1, 3)).unwrap();
        assert_eq!(whole.half_days(), 6);

        let afternoon =
            Interval::single_half_day(LeaveKind::Sickness, date(2000, 1, 1), Half::Pm);
        assert_eq!(afternoon.half_days(), 1);
    }

    #[test]
    fn deserialization_defaults_halves_and_validates() {
        let json = r#"{"kind":"holiday","start_date":"2000-01-01","end_date":"2000-01-02"}"#;
        let interval: Interval = serde_json::from_str(json).unwrap();
        assert_eq!(interval.start_half(), Half::Am);
        assert_eq!(interval.end_half(), Half::Pm);

        let inverted = r#"{"kind":"holiday","start_date":"2000-01-01","end_date":"2000-01-01","start_half":"PM","end_half":"AM"}"#;
        let err = serde_json::from_str::<Interval>(inverted).unwrap_err();
        assert!(err.to_string().contains("End before start"), "{}", err);
    }

    #[test]
    fn serialization_writes_every_field() {
        let interval = Interval::with_halves(
            LeaveKind::OtherLeave,
            date(2000, 1, 1),
            date(2000, 1, 2),
            Half::Pm,
            Half::Am,
        )
        .unwrap();
        let value = serde_json::to_value(&interval).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "kind": "other_leave",
                "start_date": "2000-01-01",
                "end_date": "2000-01-02",
                "start_half": "PM",
                "end_half": "AM",
            })
        );
    }
}
