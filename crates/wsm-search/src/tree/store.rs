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

use crate::tree::{accessor::DomainsAccessor, traversal::NodeListTraversal};
use fixedbitset::FixedBitSet;
use smallvec::SmallVec;
use wsm_core::utils::logical_stack::LogicalStack;
use wsm_graph::types::{Assignment, VertexWsm, WeightWsm};

/// One version of a pattern vertex's domain.
///
/// Valid from `node_level` up to (excluding) the level of the next entry of
/// the same vertex, or up to the current node if it is the last entry.
#[derive(Debug, Default)]
pub(crate) struct DomainEntry {
    pub(crate) domain: FixedBitSet,
    pub(crate) size: usize,
    pub(crate) node_level: usize,
}

impl Clone for DomainEntry {
    fn clone(&self) -> Self {
        Self {
            domain: self.domain.clone(),
            size: self.size,
            node_level: self.node_level,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.domain.clone_from(&source.domain);
        self.size = source.size;
        self.node_level = source.node_level;
    }
}

/// The data of one depth of the search tree.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeData {
    pub(crate) nogood: bool,
    pub(crate) scalar_product: WeightWsm,
    pub(crate) total_p_edge_weights: WeightWsm,
    /// Assignments made at this depth: the branching decision first (except
    /// at the root), then forced singletons in the order they arose.
    pub(crate) new_assignments: SmallVec<[Assignment; 8]>,
    /// Empty means "inherit from the nearest ancestor with a non-empty list".
    pub(crate) unassigned_vertices_superset: Vec<VertexWsm>,
    /// Level of that nearest ancestor, fixed when the node is pushed.
    pub(crate) superset_source: usize,
    pub(crate) n_alldiff_processed: usize,
    pub(crate) n_weights_processed: usize,
    pub(crate) n_reducers_processed: usize,
}

impl NodeData {
    fn reset_from_parent(
        &mut self,
        scalar_product: WeightWsm,
        total_p_edge_weights: WeightWsm,
        superset_source: usize,
    ) {
        self.nogood = false;
        self.scalar_product = scalar_product;
        self.total_p_edge_weights = total_p_edge_weights;
        self.new_assignments.clear();
        self.unassigned_vertices_superset.clear();
        self.superset_source = superset_source;
        self.n_alldiff_processed = 0;
        self.n_weights_processed = 0;
        self.n_reducers_processed = 0;
    }
}

/// The whole search tree: one node per depth plus a change log of domains.
///
/// For every pattern vertex, `domains[pv]` is a stack of [`DomainEntry`]s
/// with strictly increasing `node_level`. The domain of `pv` at depth `n` is
/// the one in the last entry with `node_level <= n`. An entry is only
/// appended when a domain actually changes, so nodes that do not touch `pv`
/// share one entry.
///
/// The store is read and written through two views:
/// - [`DomainsAccessor`] for the domains and data of the current node,
/// - [`NodeListTraversal`] for moving between depths.
#[derive(Debug, Clone)]
pub struct SearchTreeStore {
    pub(crate) nodes: LogicalStack<NodeData>,
    pub(crate) domains: Vec<LogicalStack<DomainEntry>>,
    number_of_target_vertices: usize,
}

impl SearchTreeStore {
    /// Creates the store with only the root node.
    ///
    /// Singleton initial domains become new assignments of the root; an
    /// empty initial domain makes the root a nogood.
    pub fn new(initial_domains: Vec<FixedBitSet>, number_of_target_vertices: usize) -> Self {
        let mut nodes: LogicalStack<NodeData> = LogicalStack::new();
        let root = nodes.push();
        root.reset_from_parent(0, 0, 0);

        let mut domains = Vec::with_capacity(initial_domains.len());
        for (pv, mut domain) in initial_domains.into_iter().enumerate() {
            domain.grow(number_of_target_vertices);
            let size = domain.count_ones(..);
            match size {
                0 => root.nogood = true,
                1 => {
                    if let Some(tv) = domain.ones().next() {
                        root.new_assignments.push((pv, tv));
                    }
                }
                _ => root.unassigned_vertices_superset.push(pv),
            }

            let mut history: LogicalStack<DomainEntry> = LogicalStack::new();
            let entry = history.push();
            entry.domain = domain;
            entry.size = size;
            entry.node_level = 0;
            domains.push(history);
        }

        Self {
            nodes,
            domains,
            number_of_target_vertices,
        }
    }

    /// Returns the depth of the current node; the root has depth 0.
    #[inline]
    pub fn current_node_level(&self) -> usize {
        self.nodes.len() - 1
    }

    #[inline]
    pub fn number_of_pattern_vertices(&self) -> usize {
        self.domains.len()
    }

    #[inline]
    pub fn number_of_target_vertices(&self) -> usize {
        self.number_of_target_vertices
    }

    /// Returns the horizontal view over the current node.
    #[inline]
    pub fn accessor(&mut self) -> DomainsAccessor<'_> {
        DomainsAccessor::new(self)
    }

    /// Returns the vertical view for moving between nodes.
    #[inline]
    pub fn traversal(&mut self) -> NodeListTraversal<'_> {
        NodeListTraversal::new(self)
    }

    /// Returns the domain of `pv` as it is at depth `level`, which must not
    /// exceed the current depth.
    pub fn domain_at_level(&self, pv: VertexWsm, level: usize) -> &FixedBitSet {
        debug_assert!(
            level <= self.current_node_level(),
            "called `SearchTreeStore::domain_at_level` with level {} beyond the current level {}",
            level,
            self.current_node_level()
        );
        let entries = self.domains[pv].as_slice();
        let index = entries.partition_point(|entry| entry.node_level <= level);
        &entries[index.saturating_sub(1)].domain
    }

    /// Returns the total number of live domain history entries.
    pub fn number_of_domain_entries(&self) -> usize {
        self.domains.iter().map(LogicalStack::len).sum()
    }

    #[inline]
    pub(crate) fn back_entry(&self, pv: VertexWsm) -> &DomainEntry {
        let history = &self.domains[pv];
        &history[history.len() - 1]
    }

    #[inline]
    pub(crate) fn current_node(&self) -> &NodeData {
        &self.nodes[self.current_node_level()]
    }

    #[inline]
    pub(crate) fn current_node_mut(&mut self) -> &mut NodeData {
        let level = self.current_node_level();
        &mut self.nodes[level]
    }

    /// Pushes a fresh child node inheriting the weights of the current node.
    pub(crate) fn push_child_node(&mut self) -> &mut NodeData {
        let parent_level = self.current_node_level();
        let parent = self.current_node();
        let superset_source = if !parent.nogood && !parent.unassigned_vertices_superset.is_empty() {
            parent_level
        } else {
            parent.superset_source
        };
        let (scalar_product, total_p_edge_weights) =
            (parent.scalar_product, parent.total_p_edge_weights);
        let child = self.nodes.push();
        child.reset_from_parent(scalar_product, total_p_edge_weights, superset_source);
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::bits;

    #[test]
    fn test_root_records_singletons_and_superset() {
        let store = SearchTreeStore::new(vec![bits(4, &[0, 1]), bits(4, &[2]), bits(4, &[1, 2, 3])], 4);
        assert_eq!(store.current_node_level(), 0);
        assert_eq!(store.number_of_pattern_vertices(), 3);
        assert_eq!(store.number_of_target_vertices(), 4);

        let root = store.current_node();
        assert!(!root.nogood);
        assert_eq!(root.new_assignments.as_slice(), &[(1, 2)]);
        assert_eq!(root.unassigned_vertices_superset, vec![0, 2]);
        assert_eq!(store.number_of_domain_entries(), 3);
    }

    #[test]
    fn test_empty_initial_domain_makes_root_nogood() {
        let store = SearchTreeStore::new(vec![bits(3, &[0]), bits(3, &[])], 3);
        assert!(store.current_node().nogood);
    }

    #[test]
    fn test_domain_entry_clone_from_copies_everything() {
        let source = DomainEntry {
            domain: bits(5, &[1, 4]),
            size: 2,
            node_level: 3,
        };
        let mut target = DomainEntry::default();
        target.clone_from(&source);
        assert_eq!(target.domain, source.domain);
        assert_eq!(target.size, 2);
        assert_eq!(target.node_level, 3);
    }
}
