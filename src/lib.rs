//! # colmax
//!
//! Distributed column-maximum counting over a binary-tree all-reduce.
//!
//! A group of ranks cooperates on one `rows x cols` integer matrix held by
//! the root. Each rank takes the maxima of a contiguous block of columns, the
//! partial maxima are combined with an all-reduce built from blocking
//! point-to-point messages over an implicit binary tree, and each rank then
//! counts how many entries of its columns fall strictly below the column
//! maximum. The counts are summed onto the root.
//!
//! ## Quick Start
//!
//! ```rust
//! use colmax::{run_local, ConfigBuilder, MatrixInput};
//!
//! # fn main() -> colmax::Result<()> {
//! let input = MatrixInput::new(3, 4, vec![
//!     1, 5, 3, 9,
//!     7, 2, 8, 4,
//!     6, 9, 1, 0,
//! ]);
//! let config = ConfigBuilder::new().num_ranks(4).build()?;
//!
//! let outcomes = run_local(&input, &config)?;
//! assert_eq!(outcomes[0].reduced, vec![7, 9, 8, 9]);
//! assert_eq!(outcomes[0].counts, Some(vec![2, 2, 2, 2]));
//! assert!(outcomes[1..].iter().all(|o| o.counts.is_none()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Bring your own transport
//!
//! The pipeline only needs a [`ProcessGroup`]: rank, size, and blocking
//! `send`/`recv`. [`LocalGroup`] runs every rank as a thread in this process;
//! any other transport implements the trait and calls
//! [`ColumnMaxCounter::run`] on every rank.
//!
//! ## Sentinel values
//!
//! Slots outside a rank's columns are filled with zero by default, which
//! clamps the maximum of an all-negative column to zero. Use
//! [`SentinelPolicy::Minimum`] when entries can be negative.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

// Process groups and collectives
pub mod network;

// Matrix storage and column kernels
pub mod matrix;

// Single-process reference
pub mod sequential;

// Distributed pipeline
pub mod pipeline;

// Re-export core functionality for convenience
pub use crate::core::{
    constants::*,
    error::{ColmaxError, Result},
    init_logging,
    types::*,
};

pub use config::{Config, ConfigBuilder, ConfigFormat, DEFAULT_CONFIG_FILE};

pub use network::{
    all_reduce_max, combine_max, tree_all_reduce_max, LocalGroup, ProcessGroup, TreeMap, TreeState,
};

pub use matrix::{
    count_below, local_column_max, random_matrix, ColumnRange, Matrix, MatrixInput,
};

pub use sequential::SequentialOutcome;

pub use pipeline::{
    aggregate_counts, count_below_column_max, run_local, ColumnMaxCounter, PipelineOutcome,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_integration() {
        let err = ColmaxError::config("test error");
        assert_eq!(err.category(), "config");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_run_local_matches_sequential() {
        let matrix = random_matrix(6, 11, 0, 50, 3).unwrap();
        let input = MatrixInput::from_matrix(&matrix);
        let expected = sequential::count_below_column_max(&input).unwrap();

        let config = ConfigBuilder::new().num_ranks(3).build().unwrap();
        let outcomes = run_local(&input, &config).unwrap();
        assert_eq!(outcomes[0].counts.as_ref(), Some(&expected.counts));
        for outcome in &outcomes {
            assert_eq!(outcome.reduced, expected.maxima);
        }
    }
}
