//! # Process group communication
//!
//! Everything a rank needs to talk to its peers. [`ProcessGroup`] is the
//! capability object handed to every distributed operation: rank and size,
//! blocking point-to-point messages, and a handful of stock collectives with
//! flat default implementations built on top of `send`/`recv`.
//!
//! - [`topology`]: implicit binary tree over ranks
//! - [`allreduce`]: the tree all-reduce (maximum) and strategy dispatch
//! - [`local`]: thread-per-rank process group over in-memory channels

pub mod allreduce;
pub mod local;
pub mod topology;

pub use allreduce::{all_reduce_max, combine_max, tree_all_reduce_max, TreeState};
pub use local::LocalGroup;
pub use topology::TreeMap;

use crate::core::constants::*;
use crate::core::error::{ColmaxError, Result};
use crate::core::types::*;

/// A fixed group of cooperating ranks.
///
/// All operations block. A send completes once the matching receive has
/// taken the message, and every collective must be entered by every rank of
/// the group in the same order.
pub trait ProcessGroup {
    /// Rank of this process, `0..size()`.
    fn rank(&self) -> Rank;

    /// Number of ranks in the group, always positive.
    fn size(&self) -> usize;

    /// Send `data` to `dest`, blocking until it has been received.
    fn send(&self, dest: Rank, tag: Tag, data: &[Value]) -> Result<()>;

    /// Receive exactly `buffer.len()` values from `source` into `buffer`.
    fn recv(&self, source: Rank, tag: Tag, buffer: &mut [Value]) -> Result<()>;

    /// Whether this rank is the root of the group.
    fn is_root(&self) -> bool {
        self.rank() == ROOT_RANK
    }

    /// Copy `buffer` from `root` into `buffer` on every other rank.
    fn broadcast(&self, root: Rank, buffer: &mut [Value]) -> Result<()> {
        check_rank(root, self.size())?;
        if self.rank() == root {
            for peer in (0..self.size()).filter(|&p| p != root) {
                self.send(peer, TAG_BROADCAST, buffer)?;
            }
            Ok(())
        } else {
            self.recv(root, TAG_BROADCAST, buffer)
        }
    }

    /// Element-wise wrapping sum of every rank's `input`, written to `output`
    /// on `root` only. `output` is untouched on the other ranks.
    fn reduce_sum(&self, root: Rank, input: &[Value], output: &mut [Value]) -> Result<()> {
        check_rank(root, self.size())?;
        if self.rank() != root {
            return self.send(root, TAG_REDUCE_SUM, input);
        }

        check_len(input.len(), output.len())?;
        output.copy_from_slice(input);
        let mut incoming = vec![0; input.len()];
        for peer in (0..self.size()).filter(|&p| p != root) {
            self.recv(peer, TAG_REDUCE_SUM, &mut incoming)?;
            for (acc, value) in output.iter_mut().zip(&incoming) {
                *acc = acc.wrapping_add(*value);
            }
        }
        Ok(())
    }

    /// Element-wise maximum of every rank's `input`, written to `output` on
    /// every rank.
    ///
    /// The default gathers onto the root rank and broadcasts the result, so
    /// it costs `2(size - 1)` messages with a linear critical path.
    fn all_reduce_max(&self, input: &[Value], output: &mut [Value]) -> Result<()> {
        check_len(input.len(), output.len())?;
        if self.rank() != ROOT_RANK {
            self.send(ROOT_RANK, TAG_ALL_REDUCE, input)?;
            return self.recv(ROOT_RANK, TAG_ALL_REDUCE, output);
        }

        output.copy_from_slice(input);
        let mut incoming = vec![0; input.len()];
        for peer in 1..self.size() {
            self.recv(peer, TAG_ALL_REDUCE, &mut incoming)?;
            combine_max(output, &incoming);
        }
        for peer in 1..self.size() {
            self.send(peer, TAG_ALL_REDUCE, output)?;
        }
        Ok(())
    }

    /// Block until every rank has entered the barrier.
    fn barrier(&self) -> Result<()> {
        if self.rank() != ROOT_RANK {
            self.send(ROOT_RANK, TAG_BARRIER, &[])?;
            return self.recv(ROOT_RANK, TAG_BARRIER, &mut []);
        }
        for peer in 1..self.size() {
            self.recv(peer, TAG_BARRIER, &mut [])?;
        }
        for peer in 1..self.size() {
            self.send(peer, TAG_BARRIER, &[])?;
        }
        Ok(())
    }
}

/// Fail with `RankOutOfRange` unless `rank < size`.
pub fn check_rank(rank: Rank, size: usize) -> Result<()> {
    if rank >= size {
        return Err(ColmaxError::rank_out_of_range(rank, size));
    }
    Ok(())
}

fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(ColmaxError::dimension_mismatch(
            format!("buffer of length {}", expected),
            format!("buffer of length {}", actual),
        ));
    }
    Ok(())
}
