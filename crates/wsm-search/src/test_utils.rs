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

//! Small builders shared by the unit tests of this crate.

use crate::problem::ProblemData;
use fixedbitset::FixedBitSet;
use wsm_graph::{
    neighbours::NeighboursData,
    types::{GraphEdgeWeights, VertexWsm, WeightWsm, get_edge},
};

pub(crate) fn bits(len: usize, values: &[usize]) -> FixedBitSet {
    let mut set = FixedBitSet::with_capacity(len);
    for &v in values {
        set.insert(v);
    }
    set
}

pub(crate) fn ones(set: &FixedBitSet) -> Vec<usize> {
    set.ones().collect()
}

pub(crate) fn edge_weights(edges: &[(VertexWsm, VertexWsm, WeightWsm)]) -> GraphEdgeWeights {
    edges
        .iter()
        .map(|&(v1, v2, weight)| (get_edge(v1, v2), weight))
        .collect()
}

pub(crate) fn neighbours_data(edges: &[(VertexWsm, VertexWsm, WeightWsm)]) -> NeighboursData {
    NeighboursData::new(&edge_weights(edges)).unwrap()
}

pub(crate) fn problem(
    pattern_edges: &[(VertexWsm, VertexWsm, WeightWsm)],
    target_edges: &[(VertexWsm, VertexWsm, WeightWsm)],
) -> ProblemData {
    ProblemData::new(neighbours_data(pattern_edges), neighbours_data(target_edges))
}

/// Every target vertex allowed for every pattern vertex.
pub(crate) fn full_domains(problem: &ProblemData) -> Vec<FixedBitSet> {
    let n = problem.number_of_target_vertices();
    let mut full = FixedBitSet::with_capacity(n);
    full.insert_range(..);
    vec![full; problem.number_of_pattern_vertices()]
}
