//! Protocol constants and configuration defaults for colmax.

use crate::core::types::*;

/// Rank that receives the final count vector and supplies the input matrix.
pub const ROOT_RANK: Rank = 0;

/// Tag for partial maxima travelling from a child up to its parent.
pub const TAG_TREE_REDUCE: Tag = 0;

/// Tag for the final maxima travelling from a parent down to its children.
pub const TAG_TREE_BROADCAST: Tag = 1;

/// Tag used by the flat broadcast collective.
pub const TAG_BROADCAST: Tag = 100;

/// Tag used by the flat sum-reduce collective.
pub const TAG_REDUCE_SUM: Tag = 101;

/// Tag used by the stock max all-reduce collective.
pub const TAG_ALL_REDUCE: Tag = 102;

/// Tag used by the barrier.
pub const TAG_BARRIER: Tag = 103;

/// Number of slots in the input header: rows, cols, validity flag.
pub const HEADER_LEN: usize = 3;

/// Default number of ranks for the in-process launcher.
pub const DEFAULT_NUM_RANKS: usize = 4;

/// Upper bound on ranks for the in-process launcher (one thread each).
pub const MAX_NUM_RANKS: usize = 1024;

/// Default bounds for generated matrix entries (half-open).
pub const DEFAULT_VALUE_LOW: Value = 0;
/// Upper bound, exclusive.
pub const DEFAULT_VALUE_HIGH: Value = 100;

/// Environment variable overriding the number of ranks.
pub const ENV_NUM_RANKS: &str = "COLMAX_NUM_RANKS";
/// Environment variable overriding the all-reduce strategy.
pub const ENV_STRATEGY: &str = "COLMAX_STRATEGY";
/// Environment variable overriding the sentinel policy.
pub const ENV_SENTINEL: &str = "COLMAX_SENTINEL";
/// Environment variable overriding the verbosity.
pub const ENV_VERBOSITY: &str = "COLMAX_VERBOSITY";

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
