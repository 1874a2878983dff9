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

//! The common-neighbours derived graph.
//!
//! Two distinct vertices are adjacent in the derived graph when they share at
//! least one neighbour; the derived edge weight is the number of shared
//! neighbours (the number of paths of length two between them). A
//! monomorphism maps the shared neighbours of `p1, p2` injectively onto
//! shared neighbours of their images, so derived weights can only grow.

use crate::{neighbours::NeighboursData, types::VertexWsm};

/// Lazily computed common-neighbour counts, cached per root vertex.
#[derive(Debug, Clone)]
pub struct DerivedGraphData {
    adjacency: Vec<Vec<VertexWsm>>,
    cache: Vec<Option<Vec<(VertexWsm, usize)>>>,
    counts_work: Vec<usize>,
    touched_work: Vec<VertexWsm>,
}

impl DerivedGraphData {
    pub fn new(neighbours_data: &NeighboursData) -> Self {
        let number_of_vertices = neighbours_data.number_of_vertices();
        Self {
            adjacency: (0..number_of_vertices)
                .map(|v| neighbours_data.neighbours(v).collect())
                .collect(),
            cache: vec![None; number_of_vertices],
            counts_work: vec![0; number_of_vertices],
            touched_work: Vec::new(),
        }
    }

    /// Returns the derived neighbours of `v` with their common-neighbour
    /// counts, sorted by vertex.
    pub fn get_neighbours_and_counts(&mut self, v: VertexWsm) -> &[(VertexWsm, usize)] {
        if self.cache[v].is_none() {
            let computed = self.compute(v);
            self.cache[v] = Some(computed);
        }
        self.cache[v].as_deref().unwrap_or(&[])
    }

    fn compute(&mut self, v: VertexWsm) -> Vec<(VertexWsm, usize)> {
        self.touched_work.clear();
        for &middle in &self.adjacency[v] {
            for &other in &self.adjacency[middle] {
                if other == v {
                    continue;
                }
                if self.counts_work[other] == 0 {
                    self.touched_work.push(other);
                }
                self.counts_work[other] += 1;
            }
        }
        self.touched_work.sort_unstable();
        let result = self
            .touched_work
            .iter()
            .map(|&other| (other, self.counts_work[other]))
            .collect();
        for &other in &self.touched_work {
            self.counts_work[other] = 0;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GraphEdgeWeights;

    #[test]
    fn test_counts_common_neighbours() {
        // Square 0-1-2-3-0 with the diagonal 0-2.
        let graph: GraphEdgeWeights = [((0, 1), 1), ((1, 2), 1), ((2, 3), 1), ((0, 3), 1), ((0, 2), 1)]
            .into_iter()
            .collect();
        let mut derived = DerivedGraphData::new(&NeighboursData::new(&graph).unwrap());

        assert_eq!(derived.get_neighbours_and_counts(1), &[(0, 1), (2, 1), (3, 2)]);
        assert_eq!(derived.get_neighbours_and_counts(3), &[(0, 1), (1, 2), (2, 1)]);
        assert_eq!(derived.get_neighbours_and_counts(0), &[(1, 1), (2, 2), (3, 1)]);
    }

    #[test]
    fn test_path_has_no_derived_edge_between_neighbours() {
        let graph: GraphEdgeWeights = [((0, 1), 1), ((1, 2), 1)].into_iter().collect();
        let mut derived = DerivedGraphData::new(&NeighboursData::new(&graph).unwrap());
        assert_eq!(derived.get_neighbours_and_counts(0), &[(2, 1)]);
        assert!(derived.get_neighbours_and_counts(1).is_empty());
    }
}
