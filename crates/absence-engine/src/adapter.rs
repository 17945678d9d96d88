//! Source adapters: translate remote absence records into [`Interval`]s.
//!
//! Each remote system has its own leave-type vocabulary and its own way of
//! marking half-days. One reports explicit `AM`/`PM` boundaries
//! ([`MeridiemRecord`]); the other flags half-day starts and ends with booleans
//! ([`FlaggedRecord`]). Both are mapped onto the single `{AM, PM}` model here,
//! at the boundary, so the rest of the engine only ever sees [`Interval`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::collection::IntervalCollection;
use crate::error::{AbsenceError, Result};
use crate::half_day::Half;
use crate::interval::{parse_date, Interval};
use crate::kind::LeaveKind;

/// Maps a remote system's native leave-type names onto [`LeaveKind`].
///
/// Lookups are case-insensitive. Canonical kind names always resolve; aliases
/// extend the vocabulary per source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindMap {
    aliases: HashMap<String, LeaveKind>,
}

impl KindMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(mut self, alias: &str, kind: LeaveKind) -> Self {
        self.aliases.insert(normalize_alias(alias), kind);
        self
    }

    /// Load aliases from a JSON object such as `{"Annual Leave": "holiday"}`.
    ///
    /// # Errors
    /// Returns `AbsenceError::KindMap` if the JSON is malformed or names an
    /// unknown canonical kind.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, LeaveKind> =
            serde_json::from_str(json).map_err(|e| AbsenceError::KindMap(e.to_string()))?;
        Ok(raw
            .into_iter()
            .fold(Self::new(), |map, (alias, kind)| map.with_alias(&alias, kind)))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Resolve a native leave-type name.
    ///
    /// # Errors
    /// Returns `AbsenceError::InvalidKind` if the name is neither an alias nor
    /// a canonical kind.
    pub fn resolve(&self, name: &str) -> Result<LeaveKind> {
        match self.aliases.get(&normalize_alias(name)) {
            Some(kind) => Ok(*kind),
            None => name.parse(),
        }
    }

    /// Convert every record, failing on the first invalid one.
    pub fn collect<R: AbsenceRecord>(&self, records: &[R]) -> Result<IntervalCollection> {
        let intervals = records
            .iter()
            .map(|record| record.to_interval(self))
            .collect::<Result<Vec<_>>>()?;
        Ok(IntervalCollection::new(intervals))
    }
}

fn normalize_alias(alias: &str) -> String {
    alias.trim().to_lowercase()
}

/// A raw absence record from one remote system.
pub trait AbsenceRecord {
    /// Validate the record and translate it into an [`Interval`].
    fn to_interval(&self, kinds: &KindMap) -> Result<Interval>;
}

/// Record from a source that reports half-days as `AM`/`PM` boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeridiemRecord {
    pub leave_type: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_half: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_half: Option<String>,
}

impl AbsenceRecord for MeridiemRecord {
    fn to_interval(&self, kinds: &KindMap) -> Result<Interval> {
        let kind = kinds.resolve(&self.leave_type)?;
        Interval::parse_as(
            kind,
            &self.start_date,
            &self.end_date,
            self.start_half.as_deref(),
            self.end_half.as_deref(),
        )
    }
}

impl From<&Interval> for MeridiemRecord {
    fn from(interval: &Interval) -> Self {
        Self {
            leave_type: interval.kind().to_string(),
            start_date: interval.start_date().to_string(),
            end_date: interval.end_date().to_string(),
            start_half: Some(interval.start_half().to_string()),
            end_half: Some(interval.end_half().to_string()),
        }
    }
}

/// Record from a source that flags half-day starts and ends with booleans.
///
/// `half_day_start` means the absence begins at midday, `half_day_end` that it
/// ends at midday. On a single-day record either flag (or both) denotes one
/// half-day: the start flag selects the afternoon, the end flag alone the
/// morning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedRecord {
    pub leave_type: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub half_day_start: bool,
    #[serde(default)]
    pub half_day_end: bool,
}

impl AbsenceRecord for FlaggedRecord {
    fn to_interval(&self, kinds: &KindMap) -> Result<Interval> {
        let kind = kinds.resolve(&self.leave_type)?;
        let start_date = parse_date(&self.start_date)?;
        let end_date = parse_date(&self.end_date)?;
        let start_half = if self.half_day_start { Half::Pm } else { Half::Am };
        let end_half = match (self.half_day_end, start_date == end_date && self.half_day_start) {
            (true, false) => Half::Am,
            _ => Half::Pm,
        };
        Interval::with_halves(kind, start_date, end_date, start_half, end_half)
    }
}

impl From<&Interval> for FlaggedRecord {
    fn from(interval: &Interval) -> Self {
        Self {
            leave_type: interval.kind().to_string(),
            start_date: interval.start_date().to_string(),
            end_date: interval.end_date().to_string(),
            half_day_start: interval.start_half() == Half::Pm,
            half_day_end: interval.end_half() == Half::Am,
        }
    }
}
