//! All-reduce (maximum) over a process group.
//!
//! [`tree_all_reduce_max`] combines partial vectors up the implicit binary
//! tree of [`TreeMap`] and sends the result back down the same edges. Every
//! non-root rank sends exactly one message up and receives exactly one
//! message down, so a group of `P` ranks exchanges `2(P - 1)` messages and
//! the critical path is twice the tree height.

use crate::core::constants::*;
use crate::core::error::Result;
use crate::core::types::*;
use crate::network::topology::{tree_height, TreeMap};
use crate::network::{check_rank, ProcessGroup};
use log::trace;

/// Protocol state of one rank during a tree all-reduce.
///
/// States only ever move forward; a rank without a parent skips
/// `SendingUp` and `ReceivingFromParent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TreeState {
    /// Nothing exchanged yet
    Start,
    /// Folding the children's partial vectors into the accumulator
    ReceivingChildren,
    /// Subtree maximum available in the accumulator
    Combined,
    /// Handing the subtree maximum to the parent
    SendingUp,
    /// Waiting for the final vector from the parent
    ReceivingFromParent,
    /// Forwarding the final vector to the children
    BroadcastingToChildren,
    /// Accumulator holds the reduced vector
    Done,
}

struct Progress {
    rank: Rank,
    state: TreeState,
}

impl Progress {
    fn new(rank: Rank) -> Self {
        Progress {
            rank,
            state: TreeState::Start,
        }
    }

    fn advance(&mut self, next: TreeState) {
        debug_assert!(next > self.state, "{:?} -> {:?}", self.state, next);
        trace!("rank {}: {:?} -> {:?}", self.rank, self.state, next);
        self.state = next;
    }
}

/// Fold `incoming` into `acc` element-wise by maximum.
pub fn combine_max(acc: &mut [Value], incoming: &[Value]) {
    for (a, &b) in acc.iter_mut().zip(incoming) {
        if b > *a {
            *a = b;
        }
    }
}

/// Element-wise maximum of every rank's `input`, returned on every rank.
///
/// Every rank must call this with the same `root` and an `input` of the same
/// length. The result does not depend on `root` or on message arrival order.
pub fn tree_all_reduce_max<G>(group: &G, input: &[Value], root: Rank) -> Result<Vec<Value>>
where
    G: ProcessGroup + ?Sized,
{
    check_rank(root, group.size())?;
    let map = TreeMap::construct(group.rank(), group.size(), root)?;
    let mut progress = Progress::new(map.rank);
    trace!(
        "rank {}: depth {} of {}, {} children",
        map.rank,
        map.depth(),
        tree_height(map.num_machines),
        map.children.len()
    );

    let mut acc = input.to_vec();
    let mut incoming = vec![0; acc.len()];

    progress.advance(TreeState::ReceivingChildren);
    for &child in &map.children {
        group.recv(child, TAG_TREE_REDUCE, &mut incoming)?;
        combine_max(&mut acc, &incoming);
    }
    progress.advance(TreeState::Combined);

    if let Some(parent) = map.parent {
        progress.advance(TreeState::SendingUp);
        group.send(parent, TAG_TREE_REDUCE, &acc)?;

        progress.advance(TreeState::ReceivingFromParent);
        group.recv(parent, TAG_TREE_BROADCAST, &mut acc)?;
    }

    progress.advance(TreeState::BroadcastingToChildren);
    for &child in &map.children {
        group.send(child, TAG_TREE_BROADCAST, &acc)?;
    }
    progress.advance(TreeState::Done);

    Ok(acc)
}

/// Element-wise maximum of every rank's `input` using the chosen strategy.
///
/// `root` only shapes the tree; the library collective ignores it.
pub fn all_reduce_max<G>(
    group: &G,
    input: &[Value],
    strategy: AllReduceStrategy,
    root: Rank,
) -> Result<Vec<Value>>
where
    G: ProcessGroup + ?Sized,
{
    match strategy {
        AllReduceStrategy::Tree => tree_all_reduce_max(group, input, root),
        AllReduceStrategy::Library => {
            let mut output = vec![0; input.len()];
            group.all_reduce_max(input, &mut output)?;
            Ok(output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::LocalGroup;

    #[test]
    fn test_combine_max() {
        let mut acc = vec![1, 5, -3, 0];
        combine_max(&mut acc, &[2, 4, -7, 0]);
        assert_eq!(acc, vec![2, 5, -3, 0]);
    }

    #[test]
    fn test_single_rank_passes_through() {
        let group = LocalGroup::single();
        let out = tree_all_reduce_max(&group, &[4, -2, 9], ROOT_RANK).unwrap();
        assert_eq!(out, vec![4, -2, 9]);
        assert_eq!(group.messages_sent(), 0);
    }

    #[test]
    fn test_tree_matches_library() {
        let results = LocalGroup::run(5, |group| {
            let r = group.rank() as Value;
            let input = vec![r * 3 % 5, 10 - r, -r];
            let tree = all_reduce_max(group, &input, AllReduceStrategy::Tree, ROOT_RANK)?;
            let library = all_reduce_max(group, &input, AllReduceStrategy::Library, ROOT_RANK)?;
            Ok::<_, crate::core::error::ColmaxError>((tree, library))
        })
        .unwrap();

        for result in results {
            let (tree, library) = result.unwrap();
            assert_eq!(tree, vec![4, 10, 0]);
            assert_eq!(tree, library);
        }
    }

    #[test]
    fn test_invalid_root_is_rejected() {
        let group = LocalGroup::single();
        assert!(tree_all_reduce_max(&group, &[1], 1).is_err());
    }

    #[test]
    fn test_state_order() {
        assert!(TreeState::Start < TreeState::ReceivingChildren);
        assert!(TreeState::SendingUp < TreeState::ReceivingFromParent);
        assert!(TreeState::BroadcastingToChildren < TreeState::Done);
    }
}
