//! Dense integer matrices and the per-rank column kernels.
//!
//! - [`partition`]: contiguous column ranges per rank
//! - [`kernels`]: local column maximum and below-maximum counting

pub mod kernels;
pub mod partition;

pub use kernels::{count_below, local_column_max};
pub use partition::ColumnRange;

use crate::core::error::{ColmaxError, Result};
use crate::core::types::Value;
use ndarray::{Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Row-major `rows x cols` matrix of [`Value`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix {
    data: Array2<Value>,
}

impl Matrix {
    /// Wrap row-major `data` as a `rows x cols` matrix.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<Value>) -> Result<Self> {
        let len = data.len();
        let data = Array2::from_shape_vec((rows, cols), data).map_err(|_| {
            ColmaxError::dimension_mismatch(
                format!("{} values for a {}x{} matrix", rows.saturating_mul(cols), rows, cols),
                format!("{} values", len),
            )
        })?;
        Ok(Matrix { data })
    }

    /// Build a matrix from equally long rows.
    pub fn from_rows(rows: &[Vec<Value>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|row| row.len() != cols) {
            return Err(ColmaxError::dimension_mismatch(
                format!("rows of length {}", cols),
                format!("a row of length {}", bad.len()),
            ));
        }
        Self::from_row_major(rows.len(), cols, rows.concat())
    }

    /// A `rows x cols` matrix of zeros, used as a receive buffer.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Element at `(row, col)`, `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Value> {
        self.data.get((row, col)).copied()
    }

    /// View of one column.
    ///
    /// # Panics
    /// If `col >= self.cols()`.
    pub fn column(&self, col: usize) -> ArrayView1<'_, Value> {
        self.data.index_axis(Axis(1), col)
    }

    /// The underlying array.
    pub fn view(&self) -> &Array2<Value> {
        &self.data
    }

    /// Row-major contents.
    pub fn as_slice(&self) -> Result<&[Value]> {
        self.data
            .as_slice()
            .ok_or_else(|| ColmaxError::internal("matrix storage is not row-major"))
    }

    /// Mutable row-major contents, e.g. as a broadcast buffer.
    pub fn as_mut_slice(&mut self) -> Result<&mut [Value]> {
        self.data
            .as_slice_mut()
            .ok_or_else(|| ColmaxError::internal("matrix storage is not row-major"))
    }

    /// Consume the matrix and return its row-major contents.
    pub fn into_row_major(self) -> Vec<Value> {
        self.data.iter().copied().collect()
    }
}

/// A seeded `rows x cols` matrix with entries uniform in `[low, high)`.
pub fn random_matrix(
    rows: usize,
    cols: usize,
    low: Value,
    high: Value,
    seed: u64,
) -> Result<Matrix> {
    if low >= high {
        return Err(ColmaxError::invalid_parameter(
            "high",
            high.to_string(),
            format!("must be greater than low ({})", low),
        ));
    }
    let len = rows.checked_mul(cols).ok_or_else(|| {
        ColmaxError::invalid_parameter(
            "rows",
            rows.to_string(),
            format!("a {}x{} matrix does not fit in memory", rows, cols),
        )
    })?;

    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..len).map(|_| rng.gen_range(low..high)).collect();
    Matrix::from_row_major(rows, cols, data)
}

/// Raw input supplied to the root rank.
///
/// Nothing is checked on construction; [`MatrixInput::validate`] runs inside
/// the distributed pipeline so that every rank learns the verdict together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixInput {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// Row-major entries, `rows * cols` of them
    pub data: Vec<Value>,
    /// Length of the output buffer the caller provides, must equal `cols`
    pub output_len: usize,
}

impl MatrixInput {
    /// Input with an output buffer of `cols` slots.
    pub fn new(rows: usize, cols: usize, data: Vec<Value>) -> Self {
        MatrixInput {
            rows,
            cols,
            data,
            output_len: cols,
        }
    }

    /// Override the caller's output buffer length.
    pub fn with_output_len(mut self, output_len: usize) -> Self {
        self.output_len = output_len;
        self
    }

    /// Input describing an existing matrix.
    pub fn from_matrix(matrix: &Matrix) -> Self {
        MatrixInput::new(matrix.rows(), matrix.cols(), matrix.view().iter().copied().collect())
    }

    /// Check that the dimensions are positive, agree with the data and the
    /// output buffer, and fit the wire header.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ColmaxError::config(format!(
                "matrix dimensions must be positive, got {}x{}",
                self.rows, self.cols
            )));
        }
        if Value::try_from(self.rows).is_err() || Value::try_from(self.cols).is_err() {
            return Err(ColmaxError::config(format!(
                "matrix dimensions {}x{} exceed {}",
                self.rows,
                self.cols,
                Value::MAX
            )));
        }
        match self.rows.checked_mul(self.cols) {
            Some(expected) if expected == self.data.len() => {}
            _ => {
                return Err(ColmaxError::config(format!(
                    "expected {} values for a {}x{} matrix, got {}",
                    self.rows.saturating_mul(self.cols),
                    self.rows,
                    self.cols,
                    self.data.len()
                )))
            }
        }
        if self.output_len != self.cols {
            return Err(ColmaxError::config(format!(
                "output buffer holds {} values but the matrix has {} columns",
                self.output_len, self.cols
            )));
        }
        Ok(())
    }

    /// Validate and convert into a [`Matrix`].
    pub fn to_matrix(&self) -> Result<Matrix> {
        self.validate()?;
        Matrix::from_row_major(self.rows, self.cols, self.data.clone())
    }
}
