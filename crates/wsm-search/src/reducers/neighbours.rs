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

//! Adjacency: the neighbours of `pv` must map to neighbours of `tv`.

use crate::{
    problem::ProblemData,
    reducers::{ReductionResult, restrict_all},
    tree::accessor::DomainsAccessor,
};
use wsm_graph::types::Assignment;

#[derive(Debug, Clone, Default)]
pub struct NeighboursReducer;

impl NeighboursReducer {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    pub fn reduce(
        &mut self,
        (pv, tv): Assignment,
        accessor: &mut DomainsAccessor<'_>,
        problem: &mut ProblemData,
    ) -> ReductionResult {
        let mask = problem.target_near.get_vertices_at_exact_distance(tv, 1);
        restrict_all(problem.pattern.neighbours(pv), mask, accessor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{full_domains, ones, problem},
        tree::store::SearchTreeStore,
    };

    #[test]
    fn test_neighbours_restricted_to_target_neighbours() {
        // Pattern: path 0-1-2. Target: star with centre 0 and leaves 1..=3.
        let mut problem = problem(&[(0, 1, 1), (1, 2, 1)], &[(0, 1, 1), (0, 2, 1), (0, 3, 1)]);
        let mut store = SearchTreeStore::new(full_domains(&problem), 4);
        let mut accessor = store.accessor();

        let result = NeighboursReducer::new().reduce((0, 1), &mut accessor, &mut problem);
        assert_eq!(result, ReductionResult::NewAssignments);
        assert_eq!(accessor.get_singleton_value(1), Some(0));
        assert_eq!(ones(accessor.get_domain(2)), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_isolated_target_vertex_is_nogood() {
        let mut problem = problem(&[(0, 1, 1)], &[(0, 1, 1), (2, 3, 1)]);
        let mut domains = full_domains(&problem);
        domains[1].set(2, false);
        domains[1].set(3, false);
        let mut store = SearchTreeStore::new(domains, 4);
        let mut accessor = store.accessor();

        let result = NeighboursReducer::new().reduce((0, 2), &mut accessor, &mut problem);
        assert_eq!(result, ReductionResult::Nogood);
        assert!(accessor.is_nogood());
    }
}
