// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The vertical view: moving between depths of the search tree.

use crate::tree::store::SearchTreeStore;
use fixedbitset::FixedBitSet;
use wsm_graph::types::{Assignment, VertexWsm};

#[derive(Debug)]
pub struct NodeListTraversal<'a> {
    store: &'a mut SearchTreeStore,
}

impl<'a> NodeListTraversal<'a> {
    #[inline]
    pub fn new(store: &'a mut SearchTreeStore) -> Self {
        Self { store }
    }

    #[inline]
    pub fn current_node_level(&self) -> usize {
        self.store.current_node_level()
    }

    /// Commits the branching decision `pv -> tv` and creates the child node.
    ///
    /// `tv` is removed from the domain of `pv` at the current node, so that
    /// after backtracking the remaining siblings are explored. If that leaves
    /// a single value it becomes a new assignment of the current node; if it
    /// leaves none the current node is marked nogood.
    pub fn move_down(&mut self, pv: VertexWsm, tv: VertexWsm) {
        let level = self.store.current_node_level();
        let number_of_target_vertices = self.store.number_of_target_vertices();
        let store = &mut *self.store;
        debug_assert!(
            !store.nodes[level].nogood,
            "called `NodeListTraversal::move_down` on nogood node {}",
            level
        );

        let history = &mut store.domains[pv];
        let back = history.len() - 1;
        debug_assert!(
            history[back].domain.contains(tv),
            "called `NodeListTraversal::move_down` with {} -> {} outside the domain",
            pv,
            tv
        );

        let entry = if history[back].node_level == level {
            &mut history[back]
        } else {
            let entry = history.push_copy_of_last();
            entry.node_level = level;
            entry
        };
        entry.domain.set(tv, false);
        entry.size = entry.domain.count_ones(..);
        match entry.size {
            0 => store.nodes[level].nogood = true,
            1 => {
                if let Some(other) = entry.domain.ones().next() {
                    store.nodes[level].new_assignments.push((pv, other));
                }
            }
            _ => {}
        }

        let child_entry = history.push();
        child_entry.domain.clear();
        child_entry.domain.grow(number_of_target_vertices);
        child_entry.domain.insert(tv);
        child_entry.size = 1;
        child_entry.node_level = level + 1;

        store.push_child_node().new_assignments.push((pv, tv));
    }

    /// Pops the current node and every nogood node above it.
    ///
    /// Returns `false` if no good node is left above the current one.
    #[inline]
    pub fn move_up(&mut self) -> bool {
        self.move_up_with(|_, _| {})
    }

    /// As [`move_up`](Self::move_up), handing the level and the new
    /// assignments of every discarded node to `on_discard`, deepest first.
    pub fn move_up_with<F>(&mut self, mut on_discard: F) -> bool
    where
        F: FnMut(usize, &[Assignment]),
    {
        let store = &mut *self.store;
        let mut level = store.current_node_level();

        while level > 0 {
            on_discard(level, &store.nodes[level].new_assignments);
            level -= 1;
            if store.nodes[level].nogood {
                continue;
            }

            store.nodes.truncate(level + 1);
            for history in &mut store.domains {
                while history.len() > 1 && history[history.len() - 1].node_level > level {
                    history.pop();
                }
            }
            return true;
        }
        false
    }

    /// Retroactively removes `tv` from the domain of `pv` in every history
    /// entry used by a live node, the current one included.
    ///
    /// Nodes sharing an entry that becomes empty are marked nogood; nodes
    /// sharing an entry that becomes a singleton receive it as a new
    /// assignment. Returns `false` iff the current node is now a nogood.
    pub fn erase_impossible_assignment(&mut self, impossible_assignment: Assignment) -> bool {
        let (pv, tv) = impossible_assignment;
        let max_level = self.store.current_node_level();

        let store = &mut *self.store;
        let history = &mut store.domains[pv];
        let n_entries = history.len();

        for ii in 0..n_entries {
            let entry_level = history[ii].node_level;
            if entry_level > max_level {
                break;
            }
            let end_level = if ii + 1 < n_entries {
                history[ii + 1].node_level.min(max_level + 1)
            } else {
                max_level + 1
            };

            let entry = &mut history[ii];
            if !entry.domain.contains(tv) {
                continue;
            }
            entry.domain.set(tv, false);
            entry.size -= 1;

            match entry.size {
                0 => {
                    for node_level in entry_level..end_level {
                        store.nodes[node_level].nogood = true;
                    }
                }
                1 => {
                    if let Some(value) = entry.domain.ones().next() {
                        for node_level in entry_level..end_level {
                            store.nodes[node_level].new_assignments.push((pv, value));
                        }
                    }
                }
                _ => {}
            }
        }

        !store.current_node().nogood
    }

    /// Returns every target vertex in some domain of some live, good node.
    pub fn get_used_target_vertices(&self) -> FixedBitSet {
        let store = &*self.store;
        let current_level = store.current_node_level();
        let mut used = FixedBitSet::with_capacity(store.number_of_target_vertices());

        for history in &store.domains {
            let entries = history.as_slice();
            for (ii, entry) in entries.iter().enumerate() {
                let end_level = entries
                    .get(ii + 1)
                    .map_or(current_level + 1, |next| next.node_level);
                if (entry.node_level..end_level).any(|level| !store.nodes[level].nogood) {
                    used.union_with(&entry.domain);
                }
            }
        }
        used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{bits, ones};

    fn store() -> SearchTreeStore {
        SearchTreeStore::new(
            vec![bits(4, &[0, 1, 2]), bits(4, &[1, 2]), bits(4, &[0, 3])],
            4,
        )
    }

    #[test]
    fn test_move_down_shares_untouched_entries() {
        let mut store = store();
        store.traversal().move_down(0, 1);

        assert_eq!(store.current_node_level(), 1);
        // The parent lost 1; the child holds {1}; pv1 and pv2 are shared.
        assert_eq!(ones(store.domain_at_level(0, 0)), vec![0, 2]);
        assert_eq!(ones(store.domain_at_level(0, 1)), vec![1]);
        assert_eq!(ones(store.domain_at_level(1, 1)), vec![1, 2]);
        assert_eq!(store.number_of_domain_entries(), 4);
        assert_eq!(store.accessor().get_new_assignments(), &[(0, 1)]);
    }

    #[test]
    fn test_move_down_forces_last_sibling_in_parent() {
        let mut store = store();
        store.traversal().move_down(1, 2);
        assert_eq!(store.nodes[0].new_assignments.as_slice(), &[(1, 1)]);
        assert_eq!(ones(store.domain_at_level(1, 0)), vec![1]);
    }

    #[test]
    fn test_move_up_discards_junk_entries() {
        let mut store = store();
        store.traversal().move_down(0, 1);
        {
            let mut accessor = store.accessor();
            accessor.erase_value(2, 0);
        }
        store.traversal().move_down(1, 2);
        assert_eq!(store.current_node_level(), 2);

        let mut discarded = Vec::new();
        assert!(
            store
                .traversal()
                .move_up_with(|_, assignments| discarded.extend_from_slice(assignments))
        );
        assert_eq!(store.current_node_level(), 1);
        assert_eq!(discarded, vec![(1, 2)]);
        assert_eq!(ones(store.accessor().get_domain(1)), vec![1]);
        assert_eq!(ones(store.accessor().get_domain(2)), vec![3]);

        assert!(store.traversal().move_up());
        assert_eq!(store.current_node_level(), 0);
        assert_eq!(ones(store.accessor().get_domain(0)), vec![0, 2]);
        assert_eq!(ones(store.accessor().get_domain(2)), vec![0, 3]);
        assert_eq!(store.number_of_domain_entries(), 3);

        assert!(!store.traversal().move_up());
    }

    #[test]
    fn test_move_up_skips_nogood_nodes() {
        let mut store = store();
        store.traversal().move_down(0, 1);
        store.traversal().move_down(2, 3);
        store.nodes[1].nogood = true;

        let mut discarded = Vec::new();
        assert!(store.traversal().move_up_with(|level, _| discarded.push(level)));
        assert_eq!(discarded, vec![2, 1]);
        assert_eq!(store.current_node_level(), 0);

        store.traversal().move_down(2, 0);
        store.nodes[0].nogood = true;
        assert!(!store.traversal().move_up());
    }

    #[test]
    fn test_erase_impossible_assignment_updates_shared_nodes() {
        let mut store = store();
        store.traversal().move_down(0, 0);
        store.traversal().move_down(2, 3);
        assert_eq!(store.current_node_level(), 2);

        // pv1 still uses its root entry {1, 2} at every level.
        assert!(
            store
                .traversal()
                .erase_impossible_assignment((1, 2))
        );
        for level in 0..=2 {
            assert!(store.nodes[level].new_assignments.contains(&(1, 1)));
            assert_eq!(ones(store.domain_at_level(1, level)), vec![1]);
        }

        // Erasing the only value left kills every node sharing the entry.
        assert!(
            !store
                .traversal()
                .erase_impossible_assignment((1, 1))
        );
        assert!(store.nodes.iter().all(|node| node.nogood));
    }

    #[test]
    fn test_erase_impossible_assignment_reaches_current_node_entry() {
        let mut store = store();
        store.traversal().move_down(0, 2);
        store.accessor().erase_value(2, 3);
        // pv2 has a root entry {0, 3} and a level-1 entry {0}.
        assert!(store.traversal().erase_impossible_assignment((2, 3)));
        assert_eq!(store.nodes[0].new_assignments.as_slice(), &[(2, 0)]);
        assert_eq!(store.nodes[1].new_assignments.as_slice(), &[(0, 2), (2, 0)]);

        assert!(!store.traversal().erase_impossible_assignment((2, 0)));
        assert!(store.nodes[0].nogood && store.nodes[1].nogood);
    }

    #[test]
    fn test_used_target_vertices_ignore_nogood_only_entries() {
        let mut store = SearchTreeStore::new(vec![bits(5, &[0, 1]), bits(5, &[1, 2])], 5);
        assert_eq!(ones(&store.traversal().get_used_target_vertices()), vec![0, 1, 2]);

        store.traversal().move_down(0, 0);
        store.accessor().mark_nogood();
        // The child's {0} entry is only used by a nogood node.
        assert_eq!(ones(&store.traversal().get_used_target_vertices()), vec![1, 2]);

        store.nodes[0].nogood = true;
        assert!(store.traversal().get_used_target_vertices().is_clear());
    }
}
