//! Union-find with path compression and union by rank

use std::collections::HashMap;
use std::hash::Hash;

/// Disjoint sets over a fixed collection of items
#[derive(Debug, Clone)]
pub struct DisjointSet<T> {
    parent: HashMap<T, T>,
    rank: HashMap<T, u32>,
}

impl<T: Copy + Eq + Hash> DisjointSet<T> {
    /// Every item starts in its own singleton set
    pub fn new<I: IntoIterator<Item = T>>(items: I) -> Self {
        let parent: HashMap<T, T> = items.into_iter().map(|item| (item, item)).collect();
        let rank = parent.keys().map(|&item| (item, 0)).collect();
        Self { parent, rank }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn contains(&self, item: T) -> bool {
        self.parent.contains_key(&item)
    }

    /// Representative of the set holding `item`, or `None` for an unknown item.
    /// Every node on the walked path is re-pointed at the root.
    pub fn find(&mut self, item: T) -> Option<T> {
        let mut root = item;
        loop {
            let parent = *self.parent.get(&root)?;
            if parent == root {
                break;
            }
            root = parent;
        }

        let mut current = item;
        while current != root {
            let next = self.parent.insert(current, root)?;
            current = next;
        }
        Some(root)
    }

    /// Merge the sets holding `a` and `b`. Returns `false` when they were
    /// already joined or either item is unknown.
    pub fn union(&mut self, a: T, b: T) -> bool {
        let (root_a, root_b) = match (self.find(a), self.find(b)) {
            (Some(root_a), Some(root_b)) => (root_a, root_b),
            _ => return false,
        };
        if root_a == root_b {
            return false;
        }

        let rank_a = self.rank.get(&root_a).copied().unwrap_or(0);
        let rank_b = self.rank.get(&root_b).copied().unwrap_or(0);
        if rank_a < rank_b {
            self.parent.insert(root_a, root_b);
        } else if rank_a > rank_b {
            self.parent.insert(root_b, root_a);
        } else {
            self.parent.insert(root_b, root_a);
            self.rank.insert(root_a, rank_a + 1);
        }
        true
    }

    /// Whether `a` and `b` share a set
    pub fn connected(&mut self, a: T, b: T) -> bool {
        match (self.find(a), self.find(b)) {
            (Some(root_a), Some(root_b)) => root_a == root_b,
            _ => false,
        }
    }

    pub fn rank(&self, item: T) -> Option<u32> {
        self.rank.get(&item).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_singletons() {
        let mut sets = DisjointSet::new([(0, 0), (0, 1), (1, 0)]);
        assert_eq!(sets.len(), 3);
        assert_eq!(sets.find((0, 1)), Some((0, 1)));
        assert_eq!(sets.find((5, 5)), None);
        assert!(!sets.connected((0, 0), (1, 0)));
    }

    #[test]
    fn test_union_by_rank() {
        let mut sets = DisjointSet::new(0..4);
        assert!(sets.union(0, 1));
        // tie: the first root survives with a bumped rank
        assert_eq!(sets.find(1), Some(0));
        assert_eq!(sets.rank(0), Some(1));

        // lower rank root goes under the higher one
        assert!(sets.union(2, 0));
        assert_eq!(sets.find(2), Some(0));
        assert_eq!(sets.rank(0), Some(1));

        assert!(!sets.union(1, 2));
        assert!(!sets.union(1, 99));
    }

    #[test]
    fn test_path_compression() {
        let mut sets = DisjointSet::new(0..8);
        sets.union(0, 1);
        sets.union(2, 3);
        sets.union(0, 2);
        sets.union(4, 5);
        sets.union(6, 7);
        sets.union(4, 6);
        sets.union(0, 4);
        let root = sets.find(7).unwrap();
        assert_eq!(sets.parent[&7], root);
        assert_eq!(sets.parent[&6], root);
    }

    proptest! {
        #[test]
        fn find_matches_naive_components(
            pairs in prop::collection::vec((0usize..20, 0usize..20), 0..40),
        ) {
            let mut sets = DisjointSet::new(0..20usize);
            let mut labels: Vec<usize> = (0..20).collect();
            for &(a, b) in &pairs {
                sets.union(a, b);
                prop_assert_eq!(sets.find(a), sets.find(b));
                let (from, to) = (labels[b], labels[a]);
                for label in labels.iter_mut() {
                    if *label == from {
                        *label = to;
                    }
                }
            }
            for a in 0..20 {
                let root = sets.find(a).unwrap();
                prop_assert_eq!(sets.find(root), Some(root));
                for b in 0..20 {
                    prop_assert_eq!(sets.connected(a, b), labels[a] == labels[b]);
                }
            }
        }
    }
}
