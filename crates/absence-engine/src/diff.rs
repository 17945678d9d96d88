//! Reconcile two interval collections into additions and removals.
//!
//! The new collection is the source of truth. `added` holds what the other
//! side is missing, `removed` what it holds that the new collection does not.
//! Elements are compared by structural equality, so both sides must be in the
//! same shape: [`DiffOptions`] normalizes the new collection (compress, then
//! split half-days) to match a target that stores intervals that way.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collection::IntervalCollection;
use crate::interval::Interval;

/// Normalization applied to the new side of a diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    /// Compress before comparing, and compress the isolated additions again.
    pub compress: bool,
    /// Split half-day boundaries before comparing, and split the additions again.
    pub split_half_days: bool,
}

impl DiffOptions {
    fn normalize(&self, collection: &IntervalCollection) -> IntervalCollection {
        let mut normalized = collection.clone();
        if self.compress {
            normalized = normalized.compress();
        }
        if self.split_half_days {
            normalized = normalized.split_half_days();
        }
        normalized
    }
}

/// The two one-sided differences between a new collection and a prior one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    /// Present in the new collection, missing from the prior one.
    pub added: IntervalCollection,
    /// Present in the prior collection, missing from the new one.
    pub removed: IntervalCollection,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Total number of create and delete operations.
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len()
    }

    /// Replay these changes on `base`: drop every removed element, then add
    /// every added one.
    pub fn apply_to(&self, base: &IntervalCollection) -> IntervalCollection {
        let removed: HashSet<&Interval> = self.removed.iter().collect();
        let kept: IntervalCollection = base
            .iter()
            .filter(|interval| !removed.contains(interval))
            .cloned()
            .collect();
        kept + self.added.clone()
    }
}

impl IntervalCollection {
    /// Compute what must be added to and removed from `other` to match `self`.
    ///
    /// When `compress` or `split_half_days` is set, `self` is normalized before
    /// comparison and the isolated additions are normalized again. `other` is
    /// used as-is.
    pub fn all_changes_from(
        &self,
        other: &IntervalCollection,
        compress: bool,
        split_half_days: bool,
    ) -> Changes {
        self.diff(
            other,
            DiffOptions {
                compress,
                split_half_days,
            },
        )
    }

    /// Same as [`all_changes_from`](Self::all_changes_from), with the flags
    /// passed as a [`DiffOptions`].
    pub fn diff(&self, other: &IntervalCollection, options: DiffOptions) -> Changes {
        let current = options.normalize(self);

        let previous: HashSet<&Interval> = other.iter().collect();
        let added: IntervalCollection = current
            .iter()
            .filter(|interval| !previous.contains(interval))
            .cloned()
            .collect();
        let added = options.normalize(&added);

        let present: HashSet<&Interval> = current.iter().collect();
        let removed: IntervalCollection = other
            .iter()
            .filter(|interval| !present.contains(interval))
            .cloned()
            .collect();

        debug!(
            current = current.len(),
            previous = other.len(),
            added = added.len(),
            removed = removed.len(),
            ?options,
            "computed interval changes"
        );
        Changes { added, removed }
    }
}
