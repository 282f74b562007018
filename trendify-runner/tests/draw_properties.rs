//! Property tests for the draw pipeline and its exports.

use proptest::prelude::*;
use serde_json::json;
use trendify_core::{DrawRng, Entry, ShuffleStrategy};
use trendify_runner::export::{export_entries_csv, export_entries_json};
use trendify_runner::{parse_entries, run_draw, DrawOptions};

fn arb_entries() -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec((0u32..500, "[a-z ,]{0,8}"), 0..30).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (tickets, name))| {
                Entry::from_value(json!({"id": i, "name": name, "tickets": tickets})).unwrap()
            })
            .collect()
    })
}

fn arb_strategy() -> impl Strategy<Value = ShuffleStrategy> {
    prop_oneof![Just(ShuffleStrategy::Cumulative), Just(ShuffleStrategy::Fenwick)]
}

proptest! {
    #[test]
    fn draw_output_is_bounded_prefix_of_a_permutation(
        entries in arb_entries(),
        max in prop::option::of(0usize..40),
        strategy in arb_strategy(),
        seed in any::<u64>(),
    ) {
        let opts = DrawOptions { strategy, max_entries: max };
        let mut rng = DrawRng::from_seed(seed);
        let result = run_draw(&entries, &opts, &mut rng).unwrap();

        let expected_len = max.map_or(entries.len(), |m| m.min(entries.len()));
        prop_assert_eq!(result.entries.len(), expected_len);
        prop_assert_eq!(result.trimmed_count(), entries.len() - expected_len);
        for (i, a) in result.entries.iter().enumerate() {
            prop_assert!(entries.contains(a));
            for b in &result.entries[i + 1..] {
                prop_assert_ne!(a.field("id"), b.field("id"));
            }
        }
    }

    #[test]
    fn exports_reparse(entries in arb_entries()) {
        let json = export_entries_json(&entries).unwrap();
        prop_assert_eq!(parse_entries(&json).unwrap(), entries.clone());

        let csv = export_entries_csv(&entries, "name").unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        prop_assert_eq!(reader.records().count(), entries.len());
    }
}
