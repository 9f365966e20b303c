//! Distributed column-maximum counting.
//!
//! Every rank runs [`ColumnMaxCounter::run`] with the same configuration.
//! The root supplies the matrix; the run then proceeds in lock step:
//!
//! 1. the root broadcasts a `[rows, cols, valid]` header, and every rank
//!    either accepts it or returns the same configuration error;
//! 2. the root broadcasts the matrix;
//! 3. each rank takes the maxima of its own columns;
//! 4. the partial maxima are all-reduced so every rank holds all of them;
//! 5. each rank counts the entries below the maximum in its own columns;
//! 6. the partial counts are summed onto the root.

use crate::config::Config;
use crate::core::constants::*;
use crate::core::error::{ColmaxError, Result};
use crate::core::types::*;
use crate::matrix::{count_below, local_column_max, ColumnRange, Matrix, MatrixInput};
use crate::network::{all_reduce_max, LocalGroup, ProcessGroup};
use log::{debug, info};

/// What one rank holds at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Rank that produced this outcome
    pub rank: Rank,
    /// Columns this rank owned
    pub range: ColumnRange,
    /// Column maxima after the all-reduce, identical on every rank
    pub reduced: Vec<Value>,
    /// Entries below the column maximum per column, on the root only
    pub counts: Option<Vec<Value>>,
}

/// Runs the column-maximum count on one rank of a process group.
#[derive(Debug)]
pub struct ColumnMaxCounter<'g, G: ProcessGroup + ?Sized> {
    group: &'g G,
    config: Config,
}

impl<'g, G: ProcessGroup + ?Sized> ColumnMaxCounter<'g, G> {
    /// Bind a configuration to this rank's group endpoint.
    pub fn new(group: &'g G, config: Config) -> Self {
        ColumnMaxCounter { group, config }
    }

    /// The configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline on this rank.
    ///
    /// `input` is read on the root only and ignored elsewhere. Every rank of
    /// the group must call this; an invalid input makes every rank return a
    /// `Config` error without exchanging anything beyond the header.
    pub fn run(&self, input: Option<&MatrixInput>) -> Result<PipelineOutcome> {
        let group = self.group;
        let rank = group.rank();
        let size = group.size();

        let root_matrix = if group.is_root() {
            Some(
                input
                    .ok_or_else(|| ColmaxError::config("the root rank needs an input matrix"))
                    .and_then(MatrixInput::to_matrix),
            )
        } else {
            if input.is_some() {
                debug!("rank {}: ignoring input supplied to a non-root rank", rank);
            }
            None
        };

        let mut header = match &root_matrix {
            Some(Ok(matrix)) => encode_header(matrix.rows(), matrix.cols(), true),
            _ => [0; HEADER_LEN],
        };
        group.broadcast(ROOT_RANK, &mut header)?;

        // the root keeps its own, more specific validation error
        let (rows, cols) = match decode_header(&header) {
            Ok(dims) => dims,
            Err(err) => {
                return Err(match root_matrix {
                    Some(Err(own)) => own,
                    _ => err,
                })
            }
        };

        let mut matrix = match root_matrix {
            Some(Ok(matrix)) => matrix,
            _ => Matrix::zeros(rows, cols),
        };
        group.broadcast(ROOT_RANK, matrix.as_mut_slice()?)?;

        let range = ColumnRange::for_rank(cols, size, rank);
        debug!(
            "rank {}/{}: {}x{} matrix, owns columns [{}, {})",
            rank, size, rows, cols, range.start, range.end
        );

        let partial = local_column_max(&matrix, range, self.config.sentinel);
        let reduced = all_reduce_max(group, &partial, self.config.strategy, ROOT_RANK)?;
        let partial_counts = count_below(&matrix, range, &reduced)?;
        let counts = aggregate_counts(group, &partial_counts)?;

        if counts.is_some() {
            info!(
                "Counted {}x{} matrix over {} ranks ({} all-reduce)",
                rows, cols, size, self.config.strategy
            );
        }

        Ok(PipelineOutcome {
            rank,
            range,
            reduced,
            counts,
        })
    }
}

/// Sum every rank's partial counts onto the root. Returns `Some` on the root
/// and `None` elsewhere.
pub fn aggregate_counts<G>(group: &G, partial: &[Value]) -> Result<Option<Vec<Value>>>
where
    G: ProcessGroup + ?Sized,
{
    let mut total = vec![0; partial.len()];
    group.reduce_sum(ROOT_RANK, partial, &mut total)?;
    Ok(if group.is_root() { Some(total) } else { None })
}

/// Run the pipeline on this rank and return the root's counts.
pub fn count_below_column_max<G>(
    group: &G,
    input: Option<&MatrixInput>,
    config: &Config,
) -> Result<Option<Vec<Value>>>
where
    G: ProcessGroup + ?Sized,
{
    ColumnMaxCounter::new(group, config.clone())
        .run(input)
        .map(|outcome| outcome.counts)
}

/// Run the pipeline on `config.effective_num_ranks()` local ranks and return
/// every rank's outcome in rank order.
pub fn run_local(input: &MatrixInput, config: &Config) -> Result<Vec<PipelineOutcome>> {
    config.validate()?;
    let size = config.effective_num_ranks();
    info!("Running on {} local ranks", size);

    LocalGroup::run(size, |group| {
        let input = if group.is_root() { Some(input) } else { None };
        ColumnMaxCounter::new(group, config.clone()).run(input)
    })?
    .into_iter()
    .collect()
}

fn encode_header(rows: usize, cols: usize, valid: bool) -> [Value; HEADER_LEN] {
    match (Value::try_from(rows), Value::try_from(cols)) {
        (Ok(rows), Ok(cols)) if valid => [rows, cols, 1],
        _ => [0; HEADER_LEN],
    }
}

fn decode_header(header: &[Value; HEADER_LEN]) -> Result<(usize, usize)> {
    let [rows, cols, valid] = *header;
    if valid != 1 {
        return Err(ColmaxError::config("input matrix rejected by the root rank"));
    }
    match (usize::try_from(rows), usize::try_from(cols)) {
        (Ok(rows), Ok(cols)) if rows > 0 && cols > 0 => Ok((rows, cols)),
        _ => Err(ColmaxError::config(format!(
            "header announces a {}x{} matrix",
            rows, cols
        ))),
    }
}
