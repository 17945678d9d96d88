//! # absence-engine
//!
//! Half-day interval algebra for leave/absence calendars, and the diff engine
//! that reconciles two independently-sourced sets of absences.
//!
//! Given the canonical absences from one system and the absences previously
//! synchronized into another, the engine answers what must be created and what
//! must be deleted to bring the two into agreement. It performs no I/O; remote
//! records are translated into [`Interval`]s by the [`adapter`] module and the
//! resulting [`Changes`] are handed back to the caller.
//!
//! ## Modules
//!
//! - [`half_day`] — `Half` (AM/PM) and the ordered `HalfDay` point
//! - [`kind`] — `LeaveKind`, the closed set of absence kinds
//! - [`interval`] — `Interval` and its covers/overlaps/adjacent/merge predicates
//! - [`collection`] — `IntervalCollection`: sorting, compression, half-day splitting
//! - [`diff`] — added/removed reconciliation between two collections
//! - [`adapter`] — per-source record formats and leave-type vocabularies
//! - [`error`] — Error types

pub mod adapter;
pub mod collection;
pub mod diff;
pub mod error;
pub mod half_day;
pub mod interval;
pub mod kind;

pub use adapter::{AbsenceRecord, FlaggedRecord, KindMap, MeridiemRecord};
pub use collection::IntervalCollection;
pub use diff::{Changes, DiffOptions};
pub use error::AbsenceError;
pub use half_day::{Half, HalfDay};
pub use interval::{Interval, Relation};
pub use kind::LeaveKind;
