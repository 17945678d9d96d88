//! Error types for absence-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbsenceError {
    #[error("Invalid leave kind: {0}")]
    InvalidKind(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid half-day marker: {0} (expected AM or PM)")]
    InvalidHalf(String),

    /// The interval would end before it starts, either by date or, on the
    /// same date, by starting in the afternoon and ending in the morning.
    #[error("End before start: interval {start} .. {end} ends before it begins")]
    EndBeforeStart { start: String, end: String },

    /// `merge_with` was called on a pair that is not `mergeable_with`.
    #[error("Cannot merge {left} with {right}: intervals are not mergeable")]
    NotMergeable { left: String, right: String },

    #[error("Invalid kind map: {0}")]
    KindMap(String),
}

pub type Result<T> = std::result::Result<T, AbsenceError>;
