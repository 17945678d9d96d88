//! Sorted collections of absence intervals, with compression and half-day splitting.
//!
//! An [`IntervalCollection`] is always ordered by start. Every transformation
//! returns a new collection and re-sorts; nothing is mutated in place.

use std::collections::HashSet;
use std::ops::Add;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::half_day::Half;
use crate::interval::Interval;
use crate::kind::LeaveKind;

/// An ordered sequence of intervals, sorted ascending by start.
///
/// Ties on start keep their input order. Duplicates and overlaps are allowed
/// until [`compress`](IntervalCollection::compress) is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Interval>", into = "Vec<Interval>")]
pub struct IntervalCollection {
    intervals: Vec<Interval>,
}

impl IntervalCollection {
    pub fn new(mut intervals: Vec<Interval>) -> Self {
        intervals.sort_by_key(Interval::start);
        Self { intervals }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn into_vec(self) -> Vec<Interval> {
        self.intervals
    }

    pub fn contains(&self, interval: &Interval) -> bool {
        self.intervals.contains(interval)
    }

    /// Distinct kinds present, in order of first appearance.
    pub fn kinds(&self) -> Vec<LeaveKind> {
        let mut kinds = Vec::new();
        for interval in &self.intervals {
            if !kinds.contains(&interval.kind()) {
                kinds.push(interval.kind());
            }
        }
        kinds
    }

    pub fn filter_kind(&self, kind: LeaveKind) -> Self {
        self.intervals
            .iter()
            .filter(|i| i.kind() == kind)
            .cloned()
            .collect()
    }

    /// Sum of [`Interval::half_days`] over every element. Overlaps count twice.
    pub fn total_half_days(&self) -> i64 {
        self.intervals.iter().map(Interval::half_days).sum()
    }

    /// Concatenate both collections and re-sort. No deduplication or merging.
    pub fn union(&self, other: &IntervalCollection) -> Self {
        let mut intervals = Vec::with_capacity(self.len() + other.len());
        intervals.extend(self.intervals.iter().cloned());
        intervals.extend(other.intervals.iter().cloned());
        Self::new(intervals)
    }

    /// Coalesce mergeable same-kind intervals into a minimal equivalent set.
    ///
    /// Intervals are grouped by kind, keeping their sorted order, and each group
    /// is folded left to right: an interval is merged into the last accumulated
    /// one when the two are mergeable, otherwise it starts a new run.
    pub fn compress(&self) -> Self {
        let mut groups: Vec<(LeaveKind, Vec<&Interval>)> = Vec::new();
        for interval in &self.intervals {
            match groups.iter_mut().find(|(kind, _)| *kind == interval.kind()) {
                Some((_, members)) => members.push(interval),
                None => groups.push((interval.kind(), vec![interval])),
            }
        }

        let mut compressed = Vec::with_capacity(self.len());
        for (kind, members) in groups {
            let mut runs: Vec<Interval> = Vec::new();
            for interval in members {
                if let Some(last) = runs.last_mut() {
                    if last.mergeable_with(interval) {
                        *last = last.merged(interval).into_owned();
                        continue;
                    }
                }
                runs.push(interval.clone());
            }
            trace!(%kind, runs = runs.len(), "compressed kind group");
            compressed.extend(runs);
        }

        debug!(
            before = self.len(),
            after = compressed.len(),
            "compressed interval collection"
        );
        Self::new(compressed)
    }

    /// Break intervals with a half-day boundary into atomic pieces.
    ///
    /// A multi-day interval starting in an afternoon yields a lone afternoon on
    /// its start date; one ending in a morning yields a lone morning on its end
    /// date. Whatever whole days remain in between form a third piece. Single-day
    /// intervals and intervals without half-day boundaries are kept as they are.
    /// Duplicate pieces are dropped.
    pub fn split_half_days(&self) -> Self {
        let mut seen = HashSet::with_capacity(self.len());
        let mut pieces = Vec::with_capacity(self.len());
        for interval in &self.intervals {
            for piece in split_interval(interval) {
                if seen.insert(piece.clone()) {
                    pieces.push(piece);
                }
            }
        }

        debug!(
            before = self.len(),
            after = pieces.len(),
            "split half-day boundaries"
        );
        Self::new(pieces)
    }
}

fn split_interval(interval: &Interval) -> Vec<Interval> {
    if !interval.has_half_day_boundary() || interval.spans_single_day() {
        return vec![interval.clone()];
    }

    let kind = interval.kind();
    let mut pieces = Vec::with_capacity(3);
    let mut full_start = Some(interval.start());
    let mut full_end = Some(interval.end());

    if interval.start_half() == Half::Pm {
        pieces.push(Interval::single_half_day(kind, interval.start_date(), Half::Pm));
        full_start = interval.start().next();
    }
    if interval.end_half() == Half::Am {
        pieces.push(Interval::single_half_day(kind, interval.end_date(), Half::Am));
        full_end = interval.end().prev();
    }
    // Both ends now sit on whole-day boundaries (AM start, PM end).
    if let (Some(start), Some(end)) = (full_start, full_end) {
        if start <= end {
            pieces.push(Interval::spanning(kind, start, end));
        }
    }
    pieces
}

impl From<Vec<Interval>> for IntervalCollection {
    fn from(intervals: Vec<Interval>) -> Self {
        Self::new(intervals)
    }
}

impl From<IntervalCollection> for Vec<Interval> {
    fn from(collection: IntervalCollection) -> Self {
        collection.intervals
    }
}

impl FromIterator<Interval> for IntervalCollection {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for IntervalCollection {
    type Item = Interval;
    type IntoIter = std::vec::IntoIter<Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.into_iter()
    }
}

impl<'a> IntoIterator for &'a IntervalCollection {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl Add for IntervalCollection {
    type Output = IntervalCollection;

    fn add(mut self, other: IntervalCollection) -> Self::Output {
        self.intervals.extend(other.intervals);
        Self::new(self.intervals)
    }
}

impl<'a> Add<&'a IntervalCollection> for &'a IntervalCollection {
    type Output = IntervalCollection;

    fn add(self, other: &'a IntervalCollection) -> Self::Output {
        self.union(other)
    }
}
