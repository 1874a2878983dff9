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

//! Cached breadth-first distance layers.
//!
//! For a root `v`, layer `d` holds the vertices at exactly distance `d` and
//! ball `d` holds every vertex at distance `1..=d` (the root excluded). Layers
//! are computed on demand from the cached layer `d - 1` and kept for the whole
//! lifetime of the data, since the graph never changes.

use crate::{neighbours::NeighboursData, types::VertexWsm};
use fixedbitset::FixedBitSet;

#[derive(Debug, Clone, Default)]
struct DistanceLayers {
    /// `layers[d - 1]`: vertices at exactly distance `d`.
    layers: Vec<FixedBitSet>,
    /// `balls[d - 1]`: vertices at distance `1..=d`.
    balls: Vec<FixedBitSet>,
    /// The last layer is empty; no further layer can be non-empty.
    exhausted: bool,
}

/// Lazily filled distance cache over one graph.
#[derive(Debug, Clone)]
pub struct NearNeighboursData {
    adjacency: Vec<Vec<VertexWsm>>,
    cache: Vec<DistanceLayers>,
    empty: FixedBitSet,
}

impl NearNeighboursData {
    /// Creates an empty cache for the graph described by `neighbours_data`.
    pub fn new(neighbours_data: &NeighboursData) -> Self {
        let number_of_vertices = neighbours_data.number_of_vertices();
        let adjacency = (0..number_of_vertices)
            .map(|v| neighbours_data.neighbours(v).collect())
            .collect();
        Self {
            adjacency,
            cache: vec![DistanceLayers::default(); number_of_vertices],
            empty: FixedBitSet::with_capacity(number_of_vertices),
        }
    }

    /// Returns the number of vertices of the underlying graph.
    #[inline]
    pub fn number_of_vertices(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the vertices at exactly distance `distance` from `v`.
    ///
    /// # Panics
    ///
    /// Panics if `distance` is zero or `v` is not a vertex.
    pub fn get_vertices_at_exact_distance(
        &mut self,
        v: VertexWsm,
        distance: usize,
    ) -> &FixedBitSet {
        assert!(
            distance > 0,
            "called `NearNeighboursData::get_vertices_at_exact_distance` with distance 0"
        );
        self.fill_layers(v, distance);
        let entry = &self.cache[v];
        entry.layers.get(distance - 1).unwrap_or(&self.empty)
    }

    /// Returns the vertices at distance `1..=distance` from `v`.
    ///
    /// # Panics
    ///
    /// Panics if `distance` is zero or `v` is not a vertex.
    pub fn get_vertices_up_to_distance(&mut self, v: VertexWsm, distance: usize) -> &FixedBitSet {
        assert!(
            distance > 0,
            "called `NearNeighboursData::get_vertices_up_to_distance` with distance 0"
        );
        self.fill_layers(v, distance);
        let entry = &self.cache[v];
        let index = (distance - 1).min(entry.balls.len().saturating_sub(1));
        entry.balls.get(index).unwrap_or(&self.empty)
    }

    /// Returns the number of vertices at exactly distance `distance` from `v`.
    #[inline]
    pub fn get_n_vertices_at_exact_distance(&mut self, v: VertexWsm, distance: usize) -> usize {
        self.get_vertices_at_exact_distance(v, distance)
            .count_ones(..)
    }

    /// Returns the number of vertices at distance `1..=distance` from `v`.
    #[inline]
    pub fn get_n_vertices_up_to_distance(&mut self, v: VertexWsm, distance: usize) -> usize {
        self.get_vertices_up_to_distance(v, distance).count_ones(..)
    }

    /// Extends the cached layers of `v` up to `distance`, or until exhausted.
    fn fill_layers(&mut self, v: VertexWsm, distance: usize) {
        let number_of_vertices = self.adjacency.len();
        let entry = &mut self.cache[v];

        if entry.layers.is_empty() {
            let mut first = FixedBitSet::with_capacity(number_of_vertices);
            for &n in &self.adjacency[v] {
                first.insert(n);
            }
            entry.exhausted = first.is_clear();
            entry.balls.push(first.clone());
            entry.layers.push(first);
        }

        while entry.layers.len() < distance && !entry.exhausted {
            let (Some(frontier), Some(ball)) = (entry.layers.last(), entry.balls.last()) else {
                break;
            };
            let mut next = FixedBitSet::with_capacity(number_of_vertices);
            for u in frontier.ones() {
                for &n in &self.adjacency[u] {
                    next.insert(n);
                }
            }
            next.difference_with(ball);
            next.set(v, false);

            let mut next_ball = ball.clone();
            next_ball.union_with(&next);

            entry.exhausted = next.is_clear();
            entry.layers.push(next);
            entry.balls.push(next_ball);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GraphEdgeWeights;

    fn path(n: usize) -> NeighboursData {
        let graph: GraphEdgeWeights = (0..n - 1).map(|i| ((i, i + 1), 1)).collect();
        NeighboursData::new(&graph).unwrap()
    }

    fn ones(bits: &FixedBitSet) -> Vec<usize> {
        bits.ones().collect()
    }

    #[test]
    fn test_exact_layers_on_path() {
        let mut near = NearNeighboursData::new(&path(6));
        assert_eq!(ones(near.get_vertices_at_exact_distance(2, 1)), vec![1, 3]);
        assert_eq!(ones(near.get_vertices_at_exact_distance(2, 2)), vec![0, 4]);
        assert_eq!(ones(near.get_vertices_at_exact_distance(2, 3)), vec![5]);
        assert!(near.get_vertices_at_exact_distance(2, 4).is_clear());
        assert!(near.get_vertices_at_exact_distance(2, 40).is_clear());
    }

    #[test]
    fn test_cumulative_counts_saturate() {
        let mut near = NearNeighboursData::new(&path(5));
        assert_eq!(near.get_n_vertices_up_to_distance(0, 1), 1);
        assert_eq!(near.get_n_vertices_up_to_distance(0, 2), 2);
        assert_eq!(near.get_n_vertices_up_to_distance(0, 4), 4);
        assert_eq!(near.get_n_vertices_up_to_distance(0, 9), 4);
        assert_eq!(ones(near.get_vertices_up_to_distance(0, 9)), vec![1, 2, 3, 4]);
        assert_eq!(near.get_n_vertices_at_exact_distance(0, 3), 1);
    }

    #[test]
    fn test_cycle_layers_exclude_root_and_previous_layers() {
        let graph: GraphEdgeWeights = [((0, 1), 1), ((1, 2), 1), ((2, 3), 1), ((0, 3), 1)]
            .into_iter()
            .collect();
        let mut near = NearNeighboursData::new(&NeighboursData::new(&graph).unwrap());
        assert_eq!(ones(near.get_vertices_at_exact_distance(0, 1)), vec![1, 3]);
        assert_eq!(ones(near.get_vertices_at_exact_distance(0, 2)), vec![2]);
        assert!(near.get_vertices_at_exact_distance(0, 3).is_clear());
        assert_eq!(ones(near.get_vertices_up_to_distance(0, 3)), vec![1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "distance 0")]
    fn test_distance_zero_panics() {
        let mut near = NearNeighboursData::new(&path(3));
        near.get_vertices_at_exact_distance(0, 0);
    }
}
