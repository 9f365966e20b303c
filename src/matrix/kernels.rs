//! Per-rank column kernels.
//!
//! Both kernels return a vector of length `cols` in which only the slots of
//! the rank's own [`ColumnRange`] carry information.

use crate::core::error::{ColmaxError, Result};
use crate::core::types::*;
use crate::matrix::{ColumnRange, Matrix};

/// Column maxima over the owned columns; every other slot holds the
/// sentinel's fill value.
pub fn local_column_max(
    matrix: &Matrix,
    range: ColumnRange,
    sentinel: SentinelPolicy,
) -> Vec<Value> {
    let mut partial = vec![sentinel.fill_value(); matrix.cols()];
    for col in range.iter().filter(|&c| c < matrix.cols()) {
        partial[col] = matrix.column(col).iter().copied().fold(Value::MIN, Value::max);
    }
    partial
}

/// Per owned column, the number of entries strictly below `reduced[col]`.
/// Unowned slots are zero.
pub fn count_below(matrix: &Matrix, range: ColumnRange, reduced: &[Value]) -> Result<Vec<Value>> {
    if reduced.len() != matrix.cols() {
        return Err(ColmaxError::dimension_mismatch(
            format!("{} column maxima", matrix.cols()),
            format!("{}", reduced.len()),
        ));
    }

    let mut counts = vec![0; matrix.cols()];
    for col in range.iter().filter(|&c| c < matrix.cols()) {
        let threshold = reduced[col];
        let below = matrix.column(col).iter().filter(|&&v| v < threshold).count();
        counts[col] = Value::try_from(below)
            .map_err(|_| ColmaxError::internal(format!("count {} overflows i32", below)))?;
    }
    Ok(counts)
}
