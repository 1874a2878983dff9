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

//! Distance consistency for one fixed distance `d >= 2`.
//!
//! If `pv -> tv` and `pv2` is at distance exactly `d` from `pv` in the
//! pattern, then `pv2` must map within distance `d` of `tv` in the target.

use crate::{
    problem::ProblemData,
    reducers::{ReductionResult, restrict_all},
    tree::accessor::DomainsAccessor,
};
use wsm_graph::types::Assignment;

#[derive(Debug, Clone)]
pub struct DistanceReducer {
    distance: usize,
}

impl DistanceReducer {
    /// # Panics
    ///
    /// Panics if `distance` is zero.
    pub fn new(distance: usize) -> Self {
        assert!(
            distance > 0,
            "called `DistanceReducer::new` with distance 0"
        );
        Self { distance }
    }

    #[inline]
    pub fn distance(&self) -> usize {
        self.distance
    }

    pub fn reduce(
        &mut self,
        (pv, tv): Assignment,
        accessor: &mut DomainsAccessor<'_>,
        problem: &mut ProblemData,
    ) -> ReductionResult {
        let pattern_vertices = problem
            .pattern_near
            .get_vertices_at_exact_distance(pv, self.distance);
        if pattern_vertices.is_clear() {
            return ReductionResult::Success;
        }
        let mask = problem
            .target_near
            .get_vertices_up_to_distance(tv, self.distance);
        restrict_all(pattern_vertices.ones(), mask, accessor)
    }
}
