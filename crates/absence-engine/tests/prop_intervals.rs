//! Property-based tests for the interval algebra using proptest.
//!
//! These tests verify laws that should hold for *any* valid intervals and
//! collections, not just the specific examples in the other test files.

use std::collections::HashSet;

use absence_engine::{Half, Interval, IntervalCollection, LeaveKind, Relation};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_kind() -> impl Strategy<Value = LeaveKind> {
    prop_oneof![Just(LeaveKind::Holiday), Just(LeaveKind::Sickness)]
}

fn arb_half() -> impl Strategy<Value = Half> {
    prop_oneof![Just(Half::Am), Just(Half::Pm)]
}

/// A valid interval of `kind` starting within the first 60 days of 2000 and
/// lasting up to 10 days. An inverted same-day `PM .. AM` is turned into a
/// single afternoon.
fn arb_interval_of(kind: LeaveKind) -> impl Strategy<Value = Interval> {
    (0i64..60, 0i64..10, arb_half(), arb_half()).prop_map(move |(offset, len, sh, eh)| {
        let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let start = base + Duration::days(offset);
        let end = start + Duration::days(len);
        let eh = if len == 0 && sh == Half::Pm { Half::Pm } else { eh };
        Interval::with_halves(kind, start, end, sh, eh).unwrap()
    })
}

fn arb_interval() -> impl Strategy<Value = Interval> {
    arb_kind().prop_flat_map(arb_interval_of)
}

fn arb_collection() -> impl Strategy<Value = IntervalCollection> {
    prop::collection::vec(arb_interval(), 0..12).prop_map(IntervalCollection::new)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn as_set(collection: &IntervalCollection) -> HashSet<Interval> {
    collection.iter().cloned().collect()
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Mutual covering implies equality
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn mutual_cover_implies_equal(
        a in arb_interval_of(LeaveKind::Holiday),
        b in arb_interval_of(LeaveKind::Holiday),
    ) {
        if a.covers(&b) && b.covers(&a) {
            prop_assert_eq!(a, b);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Exactly one relation holds between any two distinct spans
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn relations_are_mutually_exclusive(a in arb_interval(), b in arb_interval()) {
        let same_span = a.start() == b.start() && a.end() == b.end();
        let holding = [a.covers(&b), b.covers(&a), a.overlaps(&b), a.adjacent_to(&b)]
            .iter()
            .filter(|held| **held)
            .count();

        if same_span {
            prop_assert_eq!(holding, 2, "equal spans cover each other and nothing else");
        } else {
            prop_assert!(holding <= 1, "{} and {} hold {} relations", a, b, holding);
        }

        let expected = if a.covers(&b) {
            Relation::Covers
        } else if b.covers(&a) {
            Relation::CoveredBy
        } else if a.overlaps(&b) {
            Relation::Overlaps
        } else if a.adjacent_to(&b) {
            Relation::Adjacent
        } else {
            Relation::Disjoint
        };
        prop_assert_eq!(a.relation_to(&b), expected);
    }
}

// ---------------------------------------------------------------------------
// Property 3: Predicates are symmetric where they should be
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn overlap_adjacency_and_mergeability_are_symmetric(a in arb_interval(), b in arb_interval()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        prop_assert_eq!(a.adjacent_to(&b), b.adjacent_to(&a));
        prop_assert_eq!(a.mergeable_with(&b), b.mergeable_with(&a));
    }
}

// ---------------------------------------------------------------------------
// Property 4: A merge covers both inputs
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn merge_covers_both_inputs(a in arb_interval(), b in arb_interval()) {
        match a.merge_with(&b) {
            Ok(merged) => {
                prop_assert!(merged.covers(&a));
                prop_assert!(merged.covers(&b));
                prop_assert!(merged.half_days() <= a.half_days() + b.half_days());
            }
            Err(_) => prop_assert!(!a.mergeable_with(&b)),
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Compression is idempotent
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn compress_is_idempotent(collection in arb_collection()) {
        let once = collection.compress();
        let twice = once.compress();
        prop_assert_eq!(as_set(&once), as_set(&twice));
    }
}

// ---------------------------------------------------------------------------
// Property 6: Compressed output has no mergeable pair left
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn compress_leaves_no_mergeable_pairs(collection in arb_collection()) {
        let compressed = collection.compress();
        let items = compressed.as_slice();
        for (i, a) in items.iter().enumerate() {
            for b in &items[i + 1..] {
                prop_assert!(!a.mergeable_with(b), "{} and {} still mergeable", a, b);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 7: Splitting then compressing restores the compressed coverage
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn split_then_compress_roundtrips(collection in arb_collection()) {
        let direct = collection.compress();
        let via_split = collection.split_half_days().compress();
        prop_assert_eq!(as_set(&direct), as_set(&via_split));
    }
}

// ---------------------------------------------------------------------------
// Property 8: Split pieces never straddle a half-day boundary
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn split_pieces_are_atomic_or_whole_days(collection in arb_collection()) {
        for piece in collection.split_half_days().iter() {
            prop_assert!(piece.spans_single_day() || !piece.has_half_day_boundary());
        }
    }
}

// ---------------------------------------------------------------------------
// Property 9: Symmetric difference law
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn diff_is_disjoint_and_replayable(
        x in arb_collection(),
        y in arb_collection(),
        compress in any::<bool>(),
        split in any::<bool>(),
    ) {
        let forward = x.all_changes_from(&y, compress, split);
        let backward = y.all_changes_from(&x, false, false);

        let added = as_set(&forward.added);
        let removed = as_set(&forward.removed);
        prop_assert!(added.is_disjoint(&removed));
        prop_assert!(as_set(&backward.added).is_disjoint(&as_set(&backward.removed)));

        let replayed = forward.apply_to(&y);
        prop_assert_eq!(as_set(&replayed.compress()), as_set(&x.compress()));
        if !compress && !split {
            prop_assert!(added.is_disjoint(&as_set(&backward.added)));
            prop_assert_eq!(as_set(&replayed), as_set(&x));
        }
    }
}
