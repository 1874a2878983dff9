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

//! One depth-first search branch over a [`SearchTreeStore`].
//!
//! The branch owns the store and every reducer. It does not decide when to
//! stop; the driver calls [`SearchBranch::reduce_current_node`],
//! [`SearchBranch::choose_next_assignment`], [`SearchBranch::move_down`] and
//! [`SearchBranch::backtrack`] in a loop.

use crate::{
    branching::{
        complete_target::CompleteTargetBranching, value::ValueOrdering, variable::VariableOrdering,
    },
    problem::ProblemData,
    reducers::{
        Reducer, ReductionResult,
        hall_set::HallSetReducer,
        weight_nogood::{WeightNogoodDetector, WeightNogoodDetectorManager, WeightNogoodResult},
    },
    stats::SearchStatistics,
    tree::store::SearchTreeStore,
};
use fixedbitset::FixedBitSet;
use rand::Rng;
use wsm_core::num::checked::{get_checked_product, get_checked_sum};
use wsm_graph::types::{Assignment, VertexWsm, WeightWsm};

/// The outcome of folding newly processed assignments into the weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeightUpdate {
    Done,
    Nogood,
}

#[derive(Debug)]
pub struct SearchBranch {
    store: SearchTreeStore,
    reducers: Vec<Reducer>,
    hall_set_reducer: HallSetReducer,
    weight_nogood_detector: Option<WeightNogoodDetector>,
    detector_manager: WeightNogoodDetectorManager,
    /// For each pattern vertex whose weights have been counted: its image and
    /// the level at which that happened.
    assigned: Vec<Option<(VertexWsm, usize)>>,
    superset_work: Vec<VertexWsm>,
    variable_ordering: VariableOrdering,
    value_ordering: ValueOrdering,
    /// Replaces the orderings above when the target is complete.
    complete_target_branching: Option<CompleteTargetBranching>,
    statistics: SearchStatistics,
}

impl SearchBranch {
    /// Creates a branch whose root holds `initial_domains`. Distance
    /// reducers run for distances `2..=max_distance_reduction`.
    ///
    /// A complete target gets no structural reducers, since every injective
    /// map already is a monomorphism, and branches by weight instead.
    pub fn new(
        initial_domains: Vec<FixedBitSet>,
        problem: &ProblemData,
        max_distance_reduction: usize,
    ) -> Self {
        let number_of_pattern_vertices = initial_domains.len();
        let (reducers, complete_target_branching) = if problem.target_is_complete {
            (Vec::new(), Some(CompleteTargetBranching::new()))
        } else {
            (Reducer::standard_pipeline(max_distance_reduction), None)
        };
        Self {
            store: SearchTreeStore::new(initial_domains, problem.number_of_target_vertices()),
            reducers,
            hall_set_reducer: HallSetReducer::new(),
            weight_nogood_detector: None,
            detector_manager: WeightNogoodDetectorManager::new(),
            assigned: vec![None; number_of_pattern_vertices],
            superset_work: Vec::with_capacity(number_of_pattern_vertices),
            variable_ordering: VariableOrdering::new(),
            value_ordering: ValueOrdering::new(),
            complete_target_branching,
            statistics: SearchStatistics::default(),
        }
    }

    /// Enables the weight-nogood detector over the target vertices still in
    /// use. Returns the number of such vertices.
    pub fn activate_weight_nogood_detector(&mut self) -> usize {
        let used = self.store.traversal().get_used_target_vertices();
        let detector = WeightNogoodDetector::new(used);
        let count = detector.number_of_valid_target_vertices();
        self.weight_nogood_detector = Some(detector);
        count
    }

    #[inline]
    pub fn weight_nogood_detector_active(&self) -> bool {
        self.weight_nogood_detector.is_some()
    }

    #[inline]
    pub fn current_node_level(&self) -> usize {
        self.store.current_node_level()
    }

    #[inline]
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    #[inline]
    pub fn statistics_mut(&mut self) -> &mut SearchStatistics {
        &mut self.statistics
    }

    #[inline]
    pub fn store(&self) -> &SearchTreeStore {
        &self.store
    }

    /// Returns the scalar product of the assignments counted so far.
    #[inline]
    pub fn get_scalar_product(&self) -> WeightWsm {
        self.store.current_node().scalar_product
    }

    /// Returns the summed weight of the pattern edges counted so far.
    #[inline]
    pub fn get_total_p_edge_weights(&self) -> WeightWsm {
        self.store.current_node().total_p_edge_weights
    }

    /// Returns `true` if `pv` is unassigned and `tv` is still in its domain
    /// at the current node.
    pub fn can_move_down(&self, pv: VertexWsm, tv: VertexWsm) -> bool {
        if pv >= self.store.number_of_pattern_vertices() {
            return false;
        }
        let entry = self.store.back_entry(pv);
        entry.size > 1 && entry.domain.contains(tv)
    }

    /// Reduces the current node to a fixed point.
    ///
    /// Returns `false` iff the node is a nogood, which includes every node
    /// whose scalar product exceeds `max_weight`.
    pub fn reduce_current_node(&mut self, problem: &mut ProblemData, max_weight: WeightWsm) -> bool {
        if !self.reduce_to_fixed_point(problem, max_weight) {
            self.store.accessor().mark_nogood();
            self.statistics.on_nogood();
            return false;
        }

        let mut accessor = self.store.accessor();
        self.superset_work.clear();
        self.superset_work.extend(
            accessor
                .get_unassigned_pattern_vertices_superset()
                .iter()
                .copied()
                .filter(|&pv| accessor.get_domain_size(pv) > 1),
        );
        accessor.overwrite_unassigned_pattern_vertices_superset(&mut self.superset_work);
        true
    }

    fn reduce_to_fixed_point(&mut self, problem: &mut ProblemData, max_weight: WeightWsm) -> bool {
        {
            let accessor = self.store.accessor();
            if accessor.is_nogood() || accessor.get_scalar_product() > max_weight {
                return false;
            }
        }

        'pipeline: loop {
            if !self.store.accessor().alldiff_reduce_current_node() {
                return false;
            }
            if self.update_weights(problem, max_weight) == WeightUpdate::Nogood {
                return false;
            }

            match self.run_reducers(problem) {
                ReductionResult::Nogood => return false,
                ReductionResult::NewAssignments => continue 'pipeline,
                ReductionResult::Success => {}
            }

            let result = self.hall_set_reducer.reduce(&mut self.store.accessor());
            self.statistics
                .set_hall_sets_found(self.hall_set_reducer.hall_sets_found());
            match result {
                ReductionResult::Nogood => return false,
                ReductionResult::NewAssignments => continue 'pipeline,
                ReductionResult::Success => {}
            }

            match self.run_weight_nogood_detector(problem, max_weight) {
                ReductionResult::Nogood => return false,
                ReductionResult::NewAssignments => continue 'pipeline,
                ReductionResult::Success => return true,
            }
        }
    }

    /// Counts the pattern edges closed by each new assignment not yet seen.
    fn update_weights(&mut self, problem: &ProblemData, max_weight: WeightWsm) -> WeightUpdate {
        let level = self.store.current_node_level();
        let store = &mut self.store;
        let node = store.current_node_mut();
        let mut scalar_product = node.scalar_product;
        let mut total_p_edge_weights = node.total_p_edge_weights;
        let start = node.n_weights_processed;
        let end = node.new_assignments.len();
        node.n_weights_processed = end;

        for index in start..end {
            let (pv, tv) = store.current_node().new_assignments[index];
            match self.assigned[pv] {
                Some((existing, _)) if existing == tv => continue,
                Some(_) => return WeightUpdate::Nogood,
                None => {}
            }

            for &(other_pv, p_weight) in problem.pattern.neighbours_and_weights(pv) {
                let Some((other_tv, _)) = self.assigned[other_pv] else {
                    continue;
                };
                let Some(t_weight) = problem.target.edge_weight(tv, other_tv) else {
                    return WeightUpdate::Nogood;
                };
                let Some(new_scalar_product) = get_checked_product(p_weight, t_weight)
                    .and_then(|product| get_checked_sum(scalar_product, product))
                else {
                    return WeightUpdate::Nogood;
                };
                if new_scalar_product > max_weight {
                    return WeightUpdate::Nogood;
                }
                let Some(new_total) = get_checked_sum(total_p_edge_weights, p_weight) else {
                    return WeightUpdate::Nogood;
                };
                scalar_product = new_scalar_product;
                total_p_edge_weights = new_total;
            }
            self.assigned[pv] = Some((tv, level));
        }

        let node = store.current_node_mut();
        node.scalar_product = scalar_product;
        node.total_p_edge_weights = total_p_edge_weights;
        WeightUpdate::Done
    }

    /// Runs every per-assignment reducer on the pending assignments, one
    /// assignment at a time, stopping early once new assignments appear.
    fn run_reducers(&mut self, problem: &mut ProblemData) -> ReductionResult {
        let mut accessor = self.store.accessor();
        loop {
            let index = accessor.store().current_node().n_reducers_processed;
            let Some(&assignment) = accessor.get_new_assignments().get(index) else {
                return ReductionResult::Success;
            };
            accessor.store_mut().current_node_mut().n_reducers_processed += 1;

            let mut result = ReductionResult::Success;
            for reducer in self.reducers.iter_mut() {
                result = result.combine(reducer.reduce(assignment, &mut accessor, problem));
                if result == ReductionResult::Nogood {
                    return result;
                }
            }
            if result == ReductionResult::NewAssignments {
                return result;
            }
        }
    }

    fn run_weight_nogood_detector(
        &mut self,
        problem: &ProblemData,
        max_weight: WeightWsm,
    ) -> ReductionResult {
        let Some(detector) = self.weight_nogood_detector.as_mut() else {
            return ReductionResult::Success;
        };
        if !self.detector_manager.should_activate_detector(max_weight) {
            return ReductionResult::Success;
        }
        self.statistics.on_weight_checker_activation();

        let accessor = self.store.accessor();
        let max_extra_weight = max_weight.saturating_sub(accessor.get_scalar_product());
        match detector.check(&accessor, problem, max_extra_weight) {
            WeightNogoodResult::LowerBound(_) => {
                self.detector_manager.register_lower_bound_failure();
                ReductionResult::Success
            }
            WeightNogoodResult::Nogood => {
                self.detector_manager.register_success();
                self.statistics.on_weight_checker_nogood();
                ReductionResult::Nogood
            }
            WeightNogoodResult::InvalidTargetVertex(tv) => {
                self.detector_manager.register_success();
                let number_of_pattern_vertices = self.store.number_of_pattern_vertices();
                let mut traversal = self.store.traversal();
                for pv in 0..number_of_pattern_vertices {
                    if !traversal.erase_impossible_assignment((pv, tv)) {
                        return ReductionResult::Nogood;
                    }
                }
                ReductionResult::NewAssignments
            }
        }
    }

    /// Moves up until some node reduces successfully.
    ///
    /// Returns `false` once the whole tree is exhausted.
    pub fn backtrack(&mut self, problem: &mut ProblemData, max_weight: WeightWsm) -> bool {
        loop {
            let assigned = &mut self.assigned;
            let moved = self.store.traversal().move_up_with(|level, assignments| {
                for &(pv, _) in assignments {
                    if matches!(assigned[pv], Some((_, assigned_level)) if assigned_level == level) {
                        assigned[pv] = None;
                    }
                }
            });
            if !moved {
                return false;
            }
            self.statistics.on_backtrack();
            if self.reduce_current_node(problem, max_weight) {
                return true;
            }
        }
    }

    /// Branches on `pv -> tv`, which must be in the current domain of `pv`.
    pub fn move_down(&mut self, pv: VertexWsm, tv: VertexWsm) {
        self.store.traversal().move_down(pv, tv);
        self.statistics
            .on_move_down(self.store.current_node_level());
    }

    /// Picks the next branching decision, or `None` if every pattern vertex
    /// is assigned, i.e. the current node is a full solution.
    pub fn choose_next_assignment<R>(&mut self, problem: &ProblemData, rng: &mut R) -> Option<Assignment>
    where
        R: Rng + ?Sized,
    {
        let accessor = self.store.accessor();
        if let Some(branching) = &self.complete_target_branching {
            return branching.choose_next_assignment(&accessor, problem, rng);
        }
        let pv = self.variable_ordering.choose_next_variable(&accessor, rng)?;
        let tv = self
            .value_ordering
            .get_target_value(accessor.get_domain(pv), &problem.target, rng)?;
        Some((pv, tv))
    }

    /// Returns `(pv, tv)` for every pattern vertex with a singleton domain.
    pub fn get_assignments(&mut self) -> Vec<Assignment> {
        let accessor = self.store.accessor();
        (0..accessor.number_of_pattern_vertices())
            .filter_map(|pv| accessor.get_singleton_value(pv).map(|tv| (pv, tv)))
            .collect()
    }
}
