//! Contiguous column ownership.
//!
//! With `delta = ceil(cols / size)`, rank `r` owns `[delta * r, delta * (r +
//! 1))` clipped to `cols`. Trailing ranks may own nothing when `size` does not
//! divide `cols` evenly or exceeds it.

use crate::core::types::Rank;
use std::ops::Range;

/// Half-open range of columns `[start, end)` owned by one rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRange {
    /// First owned column
    pub start: usize,
    /// One past the last owned column
    pub end: usize,
}

impl ColumnRange {
    /// Columns owned by `rank` in a group of `size` ranks.
    ///
    /// Empty ranges are `[cols, cols)`.
    pub fn for_rank(cols: usize, size: usize, rank: Rank) -> Self {
        let delta = Self::columns_per_rank(cols, size);
        let end = delta.saturating_mul(rank + 1).min(cols);
        let start = delta.saturating_mul(rank).min(end);
        ColumnRange { start, end }
    }

    /// Every rank's range, in rank order.
    pub fn partition(cols: usize, size: usize) -> Vec<Self> {
        (0..size).map(|rank| Self::for_rank(cols, size, rank)).collect()
    }

    /// Width of every non-final, non-empty range: `ceil(cols / size)`.
    pub fn columns_per_rank(cols: usize, size: usize) -> usize {
        if size == 0 {
            return 0;
        }
        cols.div_ceil(size)
    }

    /// Number of owned columns
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the rank owns no columns
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `col` is owned
    pub fn contains(&self, col: usize) -> bool {
        (self.start..self.end).contains(&col)
    }

    /// Owned column indices in increasing order
    pub fn iter(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl IntoIterator for ColumnRange {
    type Item = usize;
    type IntoIter = Range<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        let ranges = ColumnRange::partition(8, 4);
        assert_eq!(
            ranges,
            vec![
                ColumnRange { start: 0, end: 2 },
                ColumnRange { start: 2, end: 4 },
                ColumnRange { start: 4, end: 6 },
                ColumnRange { start: 6, end: 8 },
            ]
        );
    }

    #[test]
    fn test_uneven_split_leaves_short_tail() {
        // delta = 3: [0,3) [3,6) [6,7)
        let ranges = ColumnRange::partition(7, 3);
        assert_eq!(ranges[2], ColumnRange { start: 6, end: 7 });
        assert_eq!(ranges.iter().map(ColumnRange::len).sum::<usize>(), 7);
    }

    #[test]
    fn test_trailing_ranks_can_be_empty() {
        // delta = 2 for 5 cols over 4 ranks: [0,2) [2,4) [4,5) and rank 3 empty
        let ranges = ColumnRange::partition(5, 4);
        assert_eq!(ranges[2], ColumnRange { start: 4, end: 5 });
        assert!(ranges[3].is_empty());
        assert_eq!(ranges[3].iter().count(), 0);
    }

    #[test]
    fn test_more_ranks_than_columns() {
        let ranges = ColumnRange::partition(2, 5);
        assert_eq!(ranges.iter().filter(|r| !r.is_empty()).count(), 2);
        for empty in &ranges[2..] {
            assert_eq!(*empty, ColumnRange { start: 2, end: 2 });
        }
    }

    #[test]
    fn test_single_rank_owns_everything() {
        let range = ColumnRange::for_rank(9, 1, 0);
        assert_eq!(range, ColumnRange { start: 0, end: 9 });
        assert!(range.contains(8));
        assert!(!range.contains(9));
        assert_eq!(range.into_iter().collect::<Vec<_>>(), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let range = ColumnRange { start: 5, end: 2 };
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
        assert_eq!(range.iter().count(), 0);
    }

    #[test]
    fn test_columns_per_rank() {
        assert_eq!(ColumnRange::columns_per_rank(4, 4), 1);
        assert_eq!(ColumnRange::columns_per_rank(5, 4), 2);
        assert_eq!(ColumnRange::columns_per_rank(3, 8), 1);
        assert_eq!(ColumnRange::columns_per_rank(3, 0), 0);
    }
}
