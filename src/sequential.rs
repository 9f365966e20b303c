//! Single-process reference computation.
//!
//! A plain nested loop over the row-major input with no partitioning and no
//! sentinel, so it always yields the true column maxima. Distributed results
//! are checked against it.

use crate::core::error::Result;
use crate::core::types::Value;
use crate::matrix::MatrixInput;
use log::debug;

/// Column maxima and below-maximum counts for one matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialOutcome {
    /// Maximum of each column
    pub maxima: Vec<Value>,
    /// Entries strictly below the column maximum, per column
    pub counts: Vec<Value>,
}

// Callers validate `input` first, so `data` holds `rows * cols >= cols` values.
fn column_max(rows: usize, cols: usize, data: &[Value]) -> Vec<Value> {
    let mut maxima = data[..cols].to_vec();
    for i in 1..rows {
        for (j, max) in maxima.iter_mut().enumerate() {
            let value = data[i * cols + j];
            if value > *max {
                *max = value;
            }
        }
    }
    maxima
}

fn count_below_maxima(
    rows: usize,
    cols: usize,
    data: &[Value],
    maxima: &[Value],
) -> Vec<Value> {
    let mut counts = vec![0; cols];
    for i in 0..rows {
        for j in 0..cols {
            if data[i * cols + j] < maxima[j] {
                counts[j] += 1;
            }
        }
    }
    counts
}

/// Validate `input` and compute its column maxima and below-maximum counts.
pub fn count_below_column_max(input: &MatrixInput) -> Result<SequentialOutcome> {
    input.validate()?;
    debug!("Sequential pass over a {}x{} matrix", input.rows, input.cols);

    let maxima = column_max(input.rows, input.cols, &input.data);
    let counts = count_below_maxima(input.rows, input.cols, &input.data, &maxima);
    Ok(SequentialOutcome { maxima, counts })
}
