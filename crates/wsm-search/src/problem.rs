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

//! The immutable graphs of one problem together with their lazy caches.

use wsm_graph::{
    derived::DerivedGraphData, near_neighbours::NearNeighboursData, neighbours::NeighboursData,
};

/// Everything the reducers read about the pattern and target graphs.
///
/// The graphs never change; the distance and derived-graph caches fill up
/// as the search asks for them, which is why reducers take `&mut`.
#[derive(Debug, Clone)]
pub struct ProblemData {
    pub pattern: NeighboursData,
    pub target: NeighboursData,
    pub pattern_near: NearNeighboursData,
    pub target_near: NearNeighboursData,
    pub pattern_derived: DerivedGraphData,
    pub target_derived: DerivedGraphData,
    /// Every pair of distinct target vertices is adjacent.
    pub target_is_complete: bool,
}

impl ProblemData {
    pub fn new(pattern: NeighboursData, target: NeighboursData) -> Self {
        Self {
            pattern_near: NearNeighboursData::new(&pattern),
            target_near: NearNeighboursData::new(&target),
            pattern_derived: DerivedGraphData::new(&pattern),
            target_derived: DerivedGraphData::new(&target),
            target_is_complete: target.is_complete(),
            pattern,
            target,
        }
    }

    #[inline]
    pub fn number_of_pattern_vertices(&self) -> usize {
        self.pattern.number_of_vertices()
    }

    #[inline]
    pub fn number_of_target_vertices(&self) -> usize {
        self.target.number_of_vertices()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::neighbours_data;

    #[test]
    fn test_sizes_and_complete_target() {
        let pattern = neighbours_data(&[(0, 1, 3), (1, 2, 4)]);
        let target = neighbours_data(&[(0, 1, 1), (1, 2, 1), (0, 2, 1)]);
        let problem = ProblemData::new(pattern, target);
        assert_eq!(problem.number_of_pattern_vertices(), 3);
        assert_eq!(problem.number_of_target_vertices(), 3);
        assert!(problem.target_is_complete);
    }

    #[test]
    fn test_missing_target_edge_is_not_complete() {
        let pattern = neighbours_data(&[(0, 1, 3)]);
        let target = neighbours_data(&[(0, 1, 1), (1, 2, 1), (0, 2, 1), (2, 3, 1)]);
        assert!(!ProblemData::new(pattern, target).target_is_complete);
    }
}
