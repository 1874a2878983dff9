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

//! Vertex, weight and edge-map primitives shared by every layer of the engine.

use std::collections::{BTreeMap, BTreeSet};

/// A vertex of the pattern or target graph.
///
/// Pattern and target vertices are numbered independently. After relabeling
/// they are dense, i.e. in `[0, N)`.
pub type VertexWsm = usize;

/// A positive integer edge weight.
pub type WeightWsm = u64;

/// An undirected edge, stored with the smaller vertex first.
pub type EdgeWsm = (VertexWsm, VertexWsm);

/// An undirected weighted graph given as an edge map.
///
/// Ordered by edge, so iteration is deterministic.
pub type GraphEdgeWeights = BTreeMap<EdgeWsm, WeightWsm>;

/// A committed `(pattern vertex, target vertex)` pair.
pub type Assignment = (VertexWsm, VertexWsm);

/// Returns `(min(v1, v2), max(v1, v2))`.
#[inline]
pub fn get_edge(v1: VertexWsm, v2: VertexWsm) -> EdgeWsm {
    if v1 <= v2 { (v1, v2) } else { (v2, v1) }
}

/// Returns every vertex mentioned by at least one edge, in increasing order.
pub fn get_vertices(edges_and_weights: &GraphEdgeWeights) -> Vec<VertexWsm> {
    let vertices: BTreeSet<VertexWsm> = edges_and_weights
        .keys()
        .flat_map(|&(v1, v2)| [v1, v2])
        .collect();
    vertices.into_iter().collect()
}

/// Returns the edge weight of `(v1, v2)` in either orientation.
#[inline]
pub fn get_edge_weight(
    edges_and_weights: &GraphEdgeWeights,
    v1: VertexWsm,
    v2: VertexWsm,
) -> Option<WeightWsm> {
    edges_and_weights.get(&get_edge(v1, v2)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_edge_orders_endpoints() {
        assert_eq!(get_edge(3, 1), (1, 3));
        assert_eq!(get_edge(1, 3), (1, 3));
        assert_eq!(get_edge(2, 2), (2, 2));
    }

    #[test]
    fn test_get_vertices_is_sorted_and_deduplicated() {
        let graph: GraphEdgeWeights = [((5, 9), 1), ((1, 5), 2), ((1, 9), 3)].into_iter().collect();
        assert_eq!(get_vertices(&graph), vec![1, 5, 9]);
        assert_eq!(get_edge_weight(&graph, 9, 1), Some(3));
        assert_eq!(get_edge_weight(&graph, 9, 2), None);
    }
}
