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

//! The horizontal view: domains and bookkeeping of the current node.

use crate::{reducers::ReductionResult, tree::store::SearchTreeStore};
use fixedbitset::FixedBitSet;
use wsm_graph::types::{Assignment, VertexWsm, WeightWsm};

/// The outcome of shrinking one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionResult {
    /// `Nogood` if the domain became empty, `NewAssignments` if it became a
    /// singleton, `Success` otherwise.
    pub reduction_result: ReductionResult,
    pub changed: bool,
    pub new_domain_size: usize,
}

/// Read/write access to the domains of the current node.
///
/// Writes are copy-on-write: the first change to a domain at the current
/// depth appends a new history entry, later changes at the same depth edit
/// that entry in place.
#[derive(Debug)]
pub struct DomainsAccessor<'a> {
    store: &'a mut SearchTreeStore,
}

impl<'a> DomainsAccessor<'a> {
    #[inline]
    pub fn new(store: &'a mut SearchTreeStore) -> Self {
        Self { store }
    }

    #[inline]
    pub fn current_node_level(&self) -> usize {
        self.store.current_node_level()
    }

    #[inline]
    pub fn number_of_pattern_vertices(&self) -> usize {
        self.store.number_of_pattern_vertices()
    }

    #[inline]
    pub fn number_of_target_vertices(&self) -> usize {
        self.store.number_of_target_vertices()
    }

    /// Returns the current domain of `pv`.
    #[inline]
    pub fn get_domain(&self, pv: VertexWsm) -> &FixedBitSet {
        &self.store.back_entry(pv).domain
    }

    /// Returns the size of the current domain of `pv`.
    #[inline]
    pub fn get_domain_size(&self, pv: VertexWsm) -> usize {
        self.store.back_entry(pv).size
    }

    /// Returns the only value of a singleton domain.
    #[inline]
    pub fn get_singleton_value(&self, pv: VertexWsm) -> Option<VertexWsm> {
        let entry = self.store.back_entry(pv);
        if entry.size == 1 {
            entry.domain.ones().next()
        } else {
            None
        }
    }

    #[inline]
    pub fn is_nogood(&self) -> bool {
        self.store.current_node().nogood
    }

    #[inline]
    pub fn mark_nogood(&mut self) {
        self.store.current_node_mut().nogood = true;
    }

    /// Returns every assignment made at this depth, processed or not.
    #[inline]
    pub fn get_new_assignments(&self) -> &[Assignment] {
        &self.store.current_node().new_assignments
    }

    #[inline]
    pub fn get_scalar_product(&self) -> WeightWsm {
        self.store.current_node().scalar_product
    }

    /// Returns a superset of the pattern vertices whose domain has size > 1.
    ///
    /// Uses the current node's own list if it recorded one, otherwise the
    /// list of the ancestor cached when the node was pushed.
    pub fn get_unassigned_pattern_vertices_superset(&self) -> &[VertexWsm] {
        let node = self.store.current_node();
        if !node.nogood && !node.unassigned_vertices_superset.is_empty() {
            return &node.unassigned_vertices_superset;
        }
        &self.store.nodes[node.superset_source].unassigned_vertices_superset
    }

    /// Replaces the current node's superset with `vertices`, handing the old
    /// buffer back through `vertices`.
    pub fn overwrite_unassigned_pattern_vertices_superset(&mut self, vertices: &mut Vec<VertexWsm>) {
        std::mem::swap(
            &mut self.store.current_node_mut().unassigned_vertices_superset,
            vertices,
        );
    }

    /// Removes `tv` from every other domain for each new assignment `(pv, tv)`
    /// not yet processed here. Returns `false` on a nogood.
    pub fn alldiff_reduce_current_node(&mut self) -> bool {
        loop {
            if self.is_nogood() {
                return false;
            }
            let node = self.store.current_node();
            let index = node.n_alldiff_processed;
            let Some(&(pv, tv)) = node.new_assignments.get(index) else {
                return true;
            };
            self.store.current_node_mut().n_alldiff_processed += 1;

            if !self.get_domain(pv).contains(tv) {
                self.mark_nogood();
                return false;
            }
            for other_pv in 0..self.number_of_pattern_vertices() {
                if other_pv == pv || !self.get_domain(other_pv).contains(tv) {
                    continue;
                }
                if self.erase_value(other_pv, tv).reduction_result == ReductionResult::Nogood {
                    return false;
                }
            }
        }
    }

    /// Restricts the domain of `pv` to `mask`.
    pub fn intersect_domain_with(&mut self, pv: VertexWsm, mask: &FixedBitSet) -> IntersectionResult {
        let unchanged = self.get_domain(pv).is_subset(mask);
        self.restrict_domain(pv, unchanged, |domain| domain.intersect_with(mask))
    }

    /// Removes every value of `forbidden` from the domain of `pv`.
    pub fn intersect_domain_with_complement(
        &mut self,
        pv: VertexWsm,
        forbidden: &FixedBitSet,
    ) -> IntersectionResult {
        let unchanged = self.get_domain(pv).is_disjoint(forbidden);
        self.restrict_domain(pv, unchanged, |domain| domain.difference_with(forbidden))
    }

    /// Removes the single value `tv` from the domain of `pv`.
    pub fn erase_value(&mut self, pv: VertexWsm, tv: VertexWsm) -> IntersectionResult {
        let unchanged = !self.get_domain(pv).contains(tv);
        self.restrict_domain(pv, unchanged, |domain| domain.set(tv, false))
    }

    fn restrict_domain<F>(&mut self, pv: VertexWsm, unchanged: bool, apply: F) -> IntersectionResult
    where
        F: FnOnce(&mut FixedBitSet),
    {
        if unchanged {
            return IntersectionResult {
                reduction_result: ReductionResult::Success,
                changed: false,
                new_domain_size: self.get_domain_size(pv),
            };
        }

        let level = self.current_node_level();
        let store = &mut *self.store;
        let history = &mut store.domains[pv];
        let back_level = history[history.len() - 1].node_level;
        let entry = if back_level == level {
            let back = history.len() - 1;
            &mut history[back]
        } else {
            let entry = history.push_copy_of_last();
            entry.node_level = level;
            entry
        };

        apply(&mut entry.domain);
        entry.size = entry.domain.count_ones(..);
        let new_domain_size = entry.size;
        let singleton = entry.domain.ones().next();

        let node = &mut store.nodes[level];
        let reduction_result = match (new_domain_size, singleton) {
            (0, _) => {
                node.nogood = true;
                ReductionResult::Nogood
            }
            (1, Some(tv)) => {
                node.new_assignments.push((pv, tv));
                ReductionResult::NewAssignments
            }
            _ => ReductionResult::Success,
        };

        IntersectionResult {
            reduction_result,
            changed: true,
            new_domain_size,
        }
    }

    #[inline]
    pub(crate) fn store(&self) -> &SearchTreeStore {
        &*self.store
    }

    #[inline]
    pub(crate) fn store_mut(&mut self) -> &mut SearchTreeStore {
        &mut *self.store
    }
}
