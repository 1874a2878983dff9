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

//! Adjacency queries over an immutable weighted graph.

use crate::{
    types::{EdgeWsm, GraphEdgeWeights, VertexWsm, WeightWsm, get_edge},
    validation::{EdgeCheckOptions, GraphError, check_edge_weights},
};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Per-vertex sorted `(neighbour, weight)` lists plus an O(1) edge lookup.
///
/// Vertices are `0..number_of_vertices()`, where the count is one more than the
/// largest vertex mentioned by an edge. After relabeling every vertex has at
/// least one neighbour.
#[derive(Debug, Clone)]
pub struct NeighboursData {
    neighbours_and_weights: Vec<Vec<(VertexWsm, WeightWsm)>>,
    edge_weights: FxHashMap<EdgeWsm, WeightWsm>,
}

impl NeighboursData {
    /// Builds the adjacency data, rejecting graphs that violate any invariant.
    pub fn new(edges_and_weights: &GraphEdgeWeights) -> Result<Self, GraphError> {
        check_edge_weights(edges_and_weights, EdgeCheckOptions::strict())?;

        let number_of_vertices = edges_and_weights
            .keys()
            .map(|&(_, v2)| v2 + 1)
            .max()
            .unwrap_or(0);

        let mut neighbours_and_weights = vec![Vec::new(); number_of_vertices];
        let mut edge_weights =
            FxHashMap::with_capacity_and_hasher(edges_and_weights.len(), Default::default());

        for (&(v1, v2), &weight) in edges_and_weights {
            neighbours_and_weights[v1].push((v2, weight));
            neighbours_and_weights[v2].push((v1, weight));
            edge_weights.insert((v1, v2), weight);
        }
        for list in &mut neighbours_and_weights {
            list.sort_unstable();
        }
        trace!(
            vertices = number_of_vertices,
            edges = edge_weights.len(),
            "built adjacency data"
        );

        Ok(Self {
            neighbours_and_weights,
            edge_weights,
        })
    }

    /// Returns the number of vertices, including isolated gaps.
    #[inline]
    pub fn number_of_vertices(&self) -> usize {
        self.neighbours_and_weights.len()
    }

    /// Returns the number of edges.
    #[inline]
    pub fn number_of_edges(&self) -> usize {
        self.edge_weights.len()
    }

    /// Returns the number of neighbours of `v`.
    ///
    /// # Panics
    ///
    /// Panics if `v` is not a vertex.
    #[inline]
    pub fn degree(&self, v: VertexWsm) -> usize {
        self.neighbours_and_weights[v].len()
    }

    /// Returns the neighbours of `v` with edge weights, sorted by neighbour.
    ///
    /// # Panics
    ///
    /// Panics if `v` is not a vertex.
    #[inline]
    pub fn neighbours_and_weights(&self, v: VertexWsm) -> &[(VertexWsm, WeightWsm)] {
        &self.neighbours_and_weights[v]
    }

    /// Iterates over the neighbours of `v` in increasing order.
    #[inline]
    pub fn neighbours(&self, v: VertexWsm) -> impl Iterator<Item = VertexWsm> + '_ {
        self.neighbours_and_weights[v].iter().map(|&(n, _)| n)
    }

    /// Returns the weight of the edge `{v1, v2}`, if it exists.
    #[inline]
    pub fn edge_weight(&self, v1: VertexWsm, v2: VertexWsm) -> Option<WeightWsm> {
        self.edge_weights.get(&get_edge(v1, v2)).copied()
    }

    /// Returns the degrees of the neighbours of `v`, largest first.
    pub fn sorted_degree_sequence(&self, v: VertexWsm) -> Vec<usize> {
        let mut degrees: Vec<usize> = self.neighbours(v).map(|n| self.degree(n)).collect();
        degrees.sort_unstable_by(|a, b| b.cmp(a));
        degrees
    }

    /// Returns the smallest weight among the edges at `v`.
    #[inline]
    pub fn min_incident_weight(&self, v: VertexWsm) -> Option<WeightWsm> {
        self.neighbours_and_weights[v].iter().map(|&(_, w)| w).min()
    }

    /// Returns `true` if there are at least two vertices and every pair of
    /// distinct vertices is adjacent. Isolated gaps make a graph incomplete.
    pub fn is_complete(&self) -> bool {
        let n = self.number_of_vertices();
        n >= 2 && n * (n - 1) / 2 == self.number_of_edges()
    }
}
