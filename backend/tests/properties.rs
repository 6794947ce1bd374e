//! Property tests over the core transforms.

use std::collections::HashSet;

use indexmap::IndexMap;
use proptest::prelude::*;

use traffic_twin::algorithms::{align, bucket_index, classify, pivot, BUCKET_COUNT, FILL_VALUE};
use traffic_twin::models::{seconds_key_from_label_range, to_label, Interval, MetricTable};
use traffic_twin::services::difference;

fn interval_strategy() -> impl Strategy<Value = Interval> {
    (0u64..200_000, 1u64..20_000).prop_map(|(start, len)| Interval::new(start, start + len).unwrap())
}

/// Rows over a small id/interval space so both tables overlap.
fn rows_strategy() -> impl Strategy<Value = Vec<(u64, u8, Option<i32>)>> {
    prop::collection::vec((0u64..6, 0u8..8, prop::option::of(-500i32..500)), 0..40)
}

fn table(rows: &[(u64, u8, Option<i32>)]) -> MetricTable {
    let mut t = MetricTable::edges(&["edge_traveltime"]);
    for (slot, entity, value) in rows {
        let interval = Interval::new(slot * 300, (slot + 1) * 300).unwrap();
        t.push_row(interval, format!("E{}", entity), vec![value.map(f64::from)])
            .unwrap();
    }
    t
}

fn means_strategy() -> impl Strategy<Value = IndexMap<String, f64>> {
    prop::collection::vec((0u8..10, -1000i32..1000), 0..10).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(id, v)| (format!("S{}", id), f64::from(v)))
            .collect()
    })
}

proptest! {
    #[test]
    fn label_round_trips_to_key(interval in interval_strategy()) {
        let key = seconds_key_from_label_range(&to_label(&interval)).unwrap();
        prop_assert_eq!(key, interval.key());
    }

    #[test]
    fn alignment_covers_the_union_without_gaps(a in rows_strategy(), b in rows_strategy()) {
        let pa = pivot(&table(&a), "edge_traveltime").unwrap();
        let pb = pivot(&table(&b), "edge_traveltime").unwrap();
        let (xa, xb) = align(&pa, &pb);

        let ids: HashSet<String> = a.iter().chain(&b).map(|(_, e, _)| format!("E{}", e)).collect();
        let slots: HashSet<u64> = a.iter().chain(&b).map(|(s, _, _)| *s).collect();

        prop_assert_eq!(xa.shape(), xb.shape());
        prop_assert_eq!(xa.shape(), (ids.len(), slots.len()));
        prop_assert_eq!(xa.rows(), xb.rows());
        prop_assert_eq!(xa.columns(), xb.columns());

        let (rows, cols) = xa.shape();
        for r in 0..rows {
            for c in 0..cols {
                prop_assert!(xa.cell(r, c).is_some());
                prop_assert!(xb.cell(r, c).is_some());
            }
        }

        // Cells one side never reported read as the fill value
        for (row, id) in xa.rows().iter().enumerate() {
            if !a.iter().any(|(_, e, _)| format!("E{}", e) == *id) {
                for c in 0..cols {
                    prop_assert_eq!(xa.cell(row, c), Some(FILL_VALUE));
                }
            }
        }
    }

    #[test]
    fn difference_is_with_minus_without(without in means_strategy(), with in means_strategy()) {
        let record = difference(&without, &with);

        let union: HashSet<&String> = without.keys().chain(with.keys()).collect();
        prop_assert_eq!(record.len(), union.len());

        for (id, entry) in &record {
            prop_assert_eq!(entry.mean_without, without.get(id).copied().unwrap_or(0.0));
            prop_assert_eq!(entry.mean_with, with.get(id).copied().unwrap_or(0.0));
            prop_assert_eq!(entry.difference, entry.mean_with - entry.mean_without);
        }
    }

    #[test]
    fn boundaries_are_non_decreasing(values in prop::collection::vec(-10_000i32..10_000, 0..60)) {
        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        let classification = classify(&values);
        let b = classification.boundaries;

        prop_assert!(b.windows(2).all(|w| w[0] <= w[1]));
        for v in &values {
            let bucket = bucket_index(*v, &classification);
            prop_assert!(bucket < BUCKET_COUNT);
            prop_assert!(b[bucket] <= *v && *v <= b[bucket + 1]);
        }
    }
}
