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

//! Domain reducers applied by the search branch.
//!
//! Per-assignment reducers see one new assignment `pv -> tv` at a time and
//! restrict the domains of pattern vertices related to `pv`. The set of
//! kinds is closed, so they are variants of [`Reducer`] rather than trait
//! objects. Whole-node reducers ([`hall_set`], [`weight_nogood`]) look at
//! every domain of the current node and are driven separately.

pub mod derived;
pub mod distance;
pub mod hall_set;
pub mod neighbours;
pub mod weight_nogood;

use crate::{problem::ProblemData, tree::accessor::DomainsAccessor};
use derived::DerivedGraphReducer;
use distance::DistanceReducer;
use fixedbitset::FixedBitSet;
use neighbours::NeighboursReducer;
use wsm_graph::types::{Assignment, VertexWsm};

/// The outcome of one reduction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionResult {
    /// Nothing left to do; any changes have been applied.
    Success,
    /// Some domain became a singleton; the pipeline must run again.
    NewAssignments,
    /// Some domain became empty; the node is dead.
    Nogood,
}

impl ReductionResult {
    /// Merges the results of two steps, the worse one winning.
    #[inline]
    pub fn combine(self, other: ReductionResult) -> ReductionResult {
        match (self, other) {
            (ReductionResult::Nogood, _) | (_, ReductionResult::Nogood) => ReductionResult::Nogood,
            (ReductionResult::NewAssignments, _) | (_, ReductionResult::NewAssignments) => {
                ReductionResult::NewAssignments
            }
            _ => ReductionResult::Success,
        }
    }
}

impl std::fmt::Display for ReductionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReductionResult::Success => write!(f, "Success"),
            ReductionResult::NewAssignments => write!(f, "NewAssignments"),
            ReductionResult::Nogood => write!(f, "Nogood"),
        }
    }
}

/// A per-assignment reducer.
#[derive(Debug, Clone)]
pub enum Reducer {
    Neighbours(NeighboursReducer),
    Distance(DistanceReducer),
    DerivedGraph(DerivedGraphReducer),
}

impl Reducer {
    /// The reducers used by the search: neighbours, then distances
    /// `2..=max_distance`, then the derived graph.
    pub fn standard_pipeline(max_distance: usize) -> Vec<Reducer> {
        let mut reducers = Vec::with_capacity(max_distance.max(1) + 1);
        reducers.push(Reducer::Neighbours(NeighboursReducer::new()));
        for distance in 2..=max_distance {
            reducers.push(Reducer::Distance(DistanceReducer::new(distance)));
        }
        reducers.push(Reducer::DerivedGraph(DerivedGraphReducer::new()));
        reducers
    }

    pub fn name(&self) -> &'static str {
        match self {
            Reducer::Neighbours(_) => "NeighboursReducer",
            Reducer::Distance(_) => "DistanceReducer",
            Reducer::DerivedGraph(_) => "DerivedGraphReducer",
        }
    }

    /// Restricts the domains of the current node implied by `assignment`.
    pub fn reduce(
        &mut self,
        assignment: Assignment,
        accessor: &mut DomainsAccessor<'_>,
        problem: &mut ProblemData,
    ) -> ReductionResult {
        match self {
            Reducer::Neighbours(reducer) => reducer.reduce(assignment, accessor, problem),
            Reducer::Distance(reducer) => reducer.reduce(assignment, accessor, problem),
            Reducer::DerivedGraph(reducer) => reducer.reduce(assignment, accessor, problem),
        }
    }
}

impl std::fmt::Display for Reducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reducer::Distance(reducer) => write!(f, "{}({})", self.name(), reducer.distance()),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Intersects the domain of every vertex in `vertices` with `mask`.
pub(crate) fn restrict_all<I>(
    vertices: I,
    mask: &FixedBitSet,
    accessor: &mut DomainsAccessor<'_>,
) -> ReductionResult
where
    I: IntoIterator<Item = VertexWsm>,
{
    let mut result = ReductionResult::Success;
    for pv in vertices {
        result = result.combine(accessor.intersect_domain_with(pv, mask).reduction_result);
        if result == ReductionResult::Nogood {
            return result;
        }
    }
    result
}
