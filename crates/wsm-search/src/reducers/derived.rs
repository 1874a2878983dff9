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

//! Common-neighbour counts.
//!
//! If `pv -> tv` and `pv, pv2` share `c` pattern neighbours, the image of
//! `pv2` must share at least `c` target neighbours with `tv`.

use crate::{problem::ProblemData, reducers::ReductionResult, tree::accessor::DomainsAccessor};
use fixedbitset::FixedBitSet;
use wsm_graph::types::Assignment;

#[derive(Debug, Clone, Default)]
pub struct DerivedGraphReducer {
    mask: FixedBitSet,
}

impl DerivedGraphReducer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduce(
        &mut self,
        (pv, tv): Assignment,
        accessor: &mut DomainsAccessor<'_>,
        problem: &mut ProblemData,
    ) -> ReductionResult {
        let number_of_target_vertices = problem.number_of_target_vertices();
        let pattern_counts = problem.pattern_derived.get_neighbours_and_counts(pv);
        let target_counts = problem.target_derived.get_neighbours_and_counts(tv);

        let mut result = ReductionResult::Success;
        let mut mask_count = 0;
        for &(pv2, count) in pattern_counts {
            if count != mask_count {
                self.mask.clear();
                self.mask.grow(number_of_target_vertices);
                for &(tv2, target_count) in target_counts {
                    if target_count >= count {
                        self.mask.insert(tv2);
                    }
                }
                mask_count = count;
            }
            result = result.combine(accessor.intersect_domain_with(pv2, &self.mask).reduction_result);
            if result == ReductionResult::Nogood {
                return result;
            }
        }
        result
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
    fn test_square_diagonal_needs_two_common_neighbours() {
        // Pattern: 4-cycle 0-1-2-3; 0 and 2 share neighbours 1 and 3.
        // Target: 4-cycle 0-1-2-3 plus a pendant path 0-4-5; 0 and 5 share
        // only 4.
        let mut problem = problem(
            &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (0, 3, 1)],
            &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (0, 3, 1), (0, 4, 1), (4, 5, 1)],
        );
        let mut store = SearchTreeStore::new(full_domains(&problem), 6);
        let mut accessor = store.accessor();

        let result = DerivedGraphReducer::new().reduce((0, 0), &mut accessor, &mut problem);
        assert_eq!(result, ReductionResult::NewAssignments);
        assert_eq!(accessor.get_singleton_value(2), Some(2));
        // 1 and 3 are adjacent to 0 and share no neighbour with it.
        assert_eq!(ones(accessor.get_domain(1)), vec![0, 1, 2, 3, 4, 5]);
    }
}
