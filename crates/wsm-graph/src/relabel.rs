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

//! Dense relabeling of vertex ids.
//!
//! The engine indexes vertices into bitsets and vectors, so both graphs are
//! renumbered to `[0, N)` before solving. Solutions are mapped back with
//! [`VertexRelabelling::new_to_old`].

use crate::types::{GraphEdgeWeights, VertexWsm, get_edge, get_vertices};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexRelabelling {
    new_to_old: Vec<VertexWsm>,
    old_to_new: BTreeMap<VertexWsm, VertexWsm>,
    new_edges_and_weights: GraphEdgeWeights,
}

impl VertexRelabelling {
    /// Renumbers the vertices of `edges_and_weights` in increasing order of
    /// their original ids.
    pub fn new(edges_and_weights: &GraphEdgeWeights) -> Self {
        let new_to_old = get_vertices(edges_and_weights);
        let old_to_new: BTreeMap<VertexWsm, VertexWsm> = new_to_old
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();

        let new_edges_and_weights = edges_and_weights
            .iter()
            .map(|(&(v1, v2), &weight)| (get_edge(old_to_new[&v1], old_to_new[&v2]), weight))
            .collect();

        Self {
            new_to_old,
            old_to_new,
            new_edges_and_weights,
        }
    }

    /// Returns the number of (non-isolated) vertices.
    #[inline]
    pub fn number_of_vertices(&self) -> usize {
        self.new_to_old.len()
    }

    /// Returns `true` if every vertex keeps its id.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.new_to_old.iter().enumerate().all(|(new, &old)| new == old)
    }

    /// Returns the original id of the relabeled vertex `new_vertex`.
    #[inline]
    pub fn new_to_old(&self, new_vertex: VertexWsm) -> Option<VertexWsm> {
        self.new_to_old.get(new_vertex).copied()
    }

    /// Returns the relabeled id of the original vertex `old_vertex`.
    #[inline]
    pub fn old_to_new(&self, old_vertex: VertexWsm) -> Option<VertexWsm> {
        self.old_to_new.get(&old_vertex).copied()
    }

    /// Returns the graph with relabeled vertices.
    #[inline]
    pub fn new_edges_and_weights(&self) -> &GraphEdgeWeights {
        &self.new_edges_and_weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relabels_gaps_to_dense_ids() {
        let graph: GraphEdgeWeights = [((3, 10), 2), ((10, 42), 5)].into_iter().collect();
        let relabelling = VertexRelabelling::new(&graph);

        assert_eq!(relabelling.number_of_vertices(), 3);
        assert!(!relabelling.is_identity());
        assert_eq!(relabelling.old_to_new(10), Some(1));
        assert_eq!(relabelling.new_to_old(2), Some(42));
        assert_eq!(relabelling.new_to_old(3), None);
        assert_eq!(
            relabelling.new_edges_and_weights(),
            &[((0, 1), 2), ((1, 2), 5)].into_iter().collect::<GraphEdgeWeights>()
        );
    }

    #[test]
    fn test_dense_graph_is_identity() {
        let graph: GraphEdgeWeights = [((0, 1), 2), ((1, 2), 5)].into_iter().collect();
        let relabelling = VertexRelabelling::new(&graph);
        assert!(relabelling.is_identity());
        assert_eq!(relabelling.new_edges_and_weights(), &graph);
    }
}
