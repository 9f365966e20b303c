//! Implicit binary tree over the ranks of a process group.
//!
//! Ranks are relabeled relative to the tree root, `v = (rank - root) mod
//! size`, and the tree is the usual array heap over `v`: the parent of `v` is
//! `(v - 1) / 2` and its children are `2v + 1` and `2v + 2` when they exist.
//! Nothing is materialized beyond one rank's own neighbourhood.

use crate::core::error::Result;
use crate::core::types::Rank;
use crate::network::check_rank;

/// Virtual rank of `rank` in a tree rooted at `root`.
pub fn virtual_rank(rank: Rank, root: Rank, size: usize) -> Rank {
    (rank + size - root) % size
}

/// Real rank of virtual rank `virtual_rank` in a tree rooted at `root`.
pub fn real_rank(virtual_rank: Rank, root: Rank, size: usize) -> Rank {
    (virtual_rank + root) % size
}

/// Parent of a virtual rank, `None` for the root.
pub fn parent_of(virtual_rank: Rank) -> Option<Rank> {
    if virtual_rank == 0 {
        None
    } else {
        Some((virtual_rank - 1) / 2)
    }
}

/// Children of a virtual rank in increasing order.
pub fn children_of(virtual_rank: Rank, size: usize) -> Vec<Rank> {
    let first = 2 * virtual_rank + 1;
    (first..first + 2).filter(|&c| c < size).collect()
}

/// Number of edges from the root down to the deepest rank.
pub fn tree_height(size: usize) -> usize {
    if size <= 1 {
        0
    } else {
        // depth of virtual rank size - 1
        (usize::BITS - size.leading_zeros() - 1) as usize
    }
}

/// One rank's view of the reduction tree, in real ranks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeMap {
    /// Rank of this machine
    pub rank: Rank,
    /// The total number of machines
    pub num_machines: usize,
    /// Rank at the root of the tree
    pub root: Rank,
    /// Position of this rank in the relabeled tree
    pub virtual_rank: Rank,
    /// Real rank of the parent, `None` at the root
    pub parent: Option<Rank>,
    /// Real ranks of the children, in the order they are served
    pub children: Vec<Rank>,
}

impl TreeMap {
    /// Create the tree map for one rank
    ///
    /// # Arguments
    /// * `rank` - Rank of this machine
    /// * `num_machines` - The total number of machines
    /// * `root` - Rank at the root of the tree
    pub fn construct(rank: Rank, num_machines: usize, root: Rank) -> Result<Self> {
        check_rank(rank, num_machines)?;
        check_rank(root, num_machines)?;

        let v = virtual_rank(rank, root, num_machines);
        let parent = parent_of(v).map(|p| real_rank(p, root, num_machines));
        let children = children_of(v, num_machines)
            .into_iter()
            .map(|c| real_rank(c, root, num_machines))
            .collect();

        Ok(TreeMap {
            rank,
            num_machines,
            root,
            virtual_rank: v,
            parent,
            children,
        })
    }

    /// Whether this rank is the tree root
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of edges between this rank and the root
    pub fn depth(&self) -> usize {
        tree_height(self.virtual_rank + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_map_construction() {
        let map = TreeMap::construct(0, 6, 0).unwrap();
        assert!(map.is_root());
        assert_eq!(map.children, vec![1, 2]);

        let map = TreeMap::construct(2, 6, 0).unwrap();
        assert_eq!(map.parent, Some(0));
        assert_eq!(map.children, vec![5]);

        let map = TreeMap::construct(4, 6, 0).unwrap();
        assert_eq!(map.parent, Some(1));
        assert!(map.children.is_empty());
    }

    #[test]
    fn test_single_machine_is_root_and_leaf() {
        let map = TreeMap::construct(0, 1, 0).unwrap();
        assert!(map.is_root());
        assert!(map.children.is_empty());
        assert_eq!(map.depth(), 0);
    }

    #[test]
    fn test_relabeled_root() {
        // size 5 rooted at 3: virtual 0..5 maps to real 3, 4, 0, 1, 2
        let map = TreeMap::construct(3, 5, 3).unwrap();
        assert!(map.is_root());
        assert_eq!(map.children, vec![4, 0]);

        let map = TreeMap::construct(4, 5, 3).unwrap();
        assert_eq!(map.virtual_rank, 1);
        assert_eq!(map.parent, Some(3));
        assert_eq!(map.children, vec![1, 2]);
    }

    #[test]
    fn test_rank_out_of_range() {
        assert!(TreeMap::construct(4, 4, 0).is_err());
        assert!(TreeMap::construct(0, 4, 4).is_err());
        assert!(TreeMap::construct(0, 0, 0).is_err());
    }

    #[test]
    fn test_every_edge_is_mutual() {
        for size in 1..=17 {
            for root in 0..size {
                let maps: Vec<TreeMap> = (0..size)
                    .map(|r| TreeMap::construct(r, size, root).unwrap())
                    .collect();
                let mut edges = 0;
                for map in &maps {
                    for &child in &map.children {
                        assert_eq!(maps[child].parent, Some(map.rank));
                        edges += 1;
                    }
                }
                assert_eq!(edges, size - 1);
                assert_eq!(maps.iter().filter(|m| m.is_root()).count(), 1);
            }
        }
    }

    #[test]
    fn test_tree_height_is_logarithmic() {
        assert_eq!(tree_height(1), 0);
        assert_eq!(tree_height(2), 1);
        assert_eq!(tree_height(3), 1);
        assert_eq!(tree_height(4), 2);
        assert_eq!(tree_height(7), 2);
        assert_eq!(tree_height(8), 3);
        assert_eq!(tree_height(1024), 10);
    }

    #[test]
    fn test_depth_matches_parent_chain() {
        let size = 13;
        for rank in 0..size {
            let map = TreeMap::construct(rank, size, 0).unwrap();
            let mut hops = 0;
            let mut v = map.virtual_rank;
            while let Some(p) = parent_of(v) {
                v = p;
                hops += 1;
            }
            assert_eq!(map.depth(), hops);
        }
    }
}
