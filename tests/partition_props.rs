//! Property tests for column ownership.

use colmax::ColumnRange;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_ranges_tile_all_columns(cols in 1usize..500, size in 1usize..64) {
        let ranges = ColumnRange::partition(cols, size);
        prop_assert_eq!(ranges.len(), size);

        let mut next = 0;
        for range in ranges.iter().filter(|r| !r.is_empty()) {
            prop_assert_eq!(range.start, next);
            next = range.end;
        }
        prop_assert_eq!(next, cols);
    }

    #[test]
    fn prop_every_column_has_exactly_one_owner(cols in 1usize..200, size in 1usize..40) {
        let ranges = ColumnRange::partition(cols, size);
        for col in 0..cols {
            let owners = ranges.iter().filter(|r| r.contains(col)).count();
            prop_assert_eq!(owners, 1);
        }
    }

    #[test]
    fn prop_widths_never_exceed_delta(cols in 1usize..500, size in 1usize..64) {
        let delta = ColumnRange::columns_per_rank(cols, size);
        for range in ColumnRange::partition(cols, size) {
            prop_assert!(range.len() <= delta);
            prop_assert!(range.start <= range.end && range.end <= cols);
        }
    }

    #[test]
    fn prop_for_rank_agrees_with_partition(
        cols in 1usize..300,
        size in 1usize..50,
        pick in any::<prop::sample::Index>(),
    ) {
        let rank = pick.index(size);
        let expected = ColumnRange::partition(cols, size)[rank];
        prop_assert_eq!(ColumnRange::for_rank(cols, size, rank), expected);
    }
}
