use proptest::prelude::*;

use procdash::system::snapshot::{ProcessInfo, filter_snapshot};

fn arb_row() -> impl Strategy<Value = ProcessInfo> {
    ("[a-zA-Z ]{0,12}", 1u32..100_000u32, 0f32..200f32, 0f32..100f32).prop_map(
        |(name, pid, cpu, mem)| ProcessInfo {
            pid,
            name,
            status: "running".to_string(),
            cpu_percent: cpu,
            memory_percent: mem,
        },
    )
}

proptest! {
    #[test]
    fn filtered_rows_form_a_matching_subsequence(
        rows in proptest::collection::vec(arb_row(), 0..40),
        needle in "[a-zA-Z]{0,3}",
    ) {
        let filtered = filter_snapshot(&rows, &needle);

        // Every kept row matches the needle case-insensitively.
        let lower = needle.to_lowercase();
        for row in &filtered {
            prop_assert!(row.name.to_lowercase().contains(&lower));
        }

        // Kept rows appear in the original order (greedy walk).
        let mut idx = 0;
        for row in &rows {
            if idx < filtered.len() && *row == filtered[idx] {
                idx += 1;
            }
        }
        prop_assert_eq!(idx, filtered.len());
    }

    #[test]
    fn empty_filter_is_identity(rows in proptest::collection::vec(arb_row(), 0..40)) {
        let filtered = filter_snapshot(&rows, "");
        prop_assert_eq!(filtered, rows);
    }

    #[test]
    fn filtering_is_idempotent(
        rows in proptest::collection::vec(arb_row(), 0..40),
        needle in "[a-zA-Z]{0,3}",
    ) {
        let once = filter_snapshot(&rows, &needle);
        let twice = filter_snapshot(&once, &needle);
        prop_assert_eq!(once, twice);
    }
}
