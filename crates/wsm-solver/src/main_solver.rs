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

//! # Main Solver
//!
//! The anytime branch-and-bound driver. Construction does all the one-off
//! work: validation, relabeling, trivial bounds, root domains. Each call to
//! [`MainSolver::solve`] then runs the search for a bounded time and number
//! of iterations and returns, leaving the search state intact, so the next
//! call resumes where the previous one stopped.
//!
//! ## Bounds
//!
//! With pattern weights `p` and target weights `t` both sorted ascending and
//! `k = |p|`, the rearrangement inequality gives:
//!
//! - lower bound: `p[i]` paired with the `k` smallest target weights in
//!   descending order,
//! - upper bound: `p[i]` paired with the `k` largest target weights in
//!   ascending order.
//!
//! ## Solution policy
//!
//! - `for_multiple_full_solutions_the_max_number_to_obtain == 0`: only the
//!   best solution is kept, and every later solution must be strictly better.
//! - `n > 0`: up to `n` solutions within the weight bound, in the order found.
//!
//! ## Suggestions
//!
//! [`MainSolverParameters::suggested_assignments`] steer the first descent:
//! each suggestion is tried once, in order, and skipped if its pattern
//! vertex is already assigned or its target vertex has left the domain. The
//! first backtrack discards whatever is left.

use crate::{
    error::SolverError,
    monitor::{
        composite::CompositeSearchMonitor,
        iteration_limit::IterationLimitMonitor,
        no_op::NoOperationMonitor,
        search_monitor::{SearchCommand, SearchMonitor},
        time_limit::TimeLimitMonitor,
    },
    params::MainSolverParameters,
    solution_data::SolutionData,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};
use tracing::{debug, info, trace};
use wsm_core::num::checked::{IntegerOverflow, get_sum_of_products_or_overflow};
use wsm_graph::{
    neighbours::NeighboursData,
    relabel::VertexRelabelling,
    solution::SolutionWsm,
    types::{Assignment, GraphEdgeWeights, WeightWsm},
    validation::{EdgeCheckOptions, check_edge_weights},
};
use wsm_search::{
    branch::SearchBranch, domain_init::DomainInitialiser, problem::ProblemData,
    stats::SearchStatistics,
};

/// Where the search loop stands between iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchPhase {
    /// The root has not been reduced yet.
    Root,
    /// The current node is reduced and not a full solution.
    AtValidNode,
    /// The current node is a full solution that has been recorded.
    AtSolution,
    /// Every node has been explored.
    Exhausted,
}

/// The result of one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Continue,
    Solution,
    Exhausted,
}

/// The search state, present only while a solution may still be found.
#[derive(Debug)]
struct ActiveSearch {
    problem: ProblemData,
    branch: SearchBranch,
    rng: ChaCha8Rng,
    phase: SearchPhase,
    /// Suggested assignments in relabeled ids, not yet tried.
    suggestions: VecDeque<Assignment>,
}

impl ActiveSearch {
    fn advance<M>(&mut self, max_weight: WeightWsm, monitor: &mut M) -> StepOutcome
    where
        M: SearchMonitor + ?Sized,
    {
        match self.phase {
            SearchPhase::Root => {
                self.phase = SearchPhase::AtValidNode;
                if self.branch.reduce_current_node(&mut self.problem, max_weight) {
                    StepOutcome::Continue
                } else {
                    self.backtrack(max_weight, monitor)
                }
            }
            SearchPhase::AtValidNode => {
                let next = match self.next_suggestion() {
                    Some(assignment) => Some(assignment),
                    None => self
                        .branch
                        .choose_next_assignment(&self.problem, &mut self.rng),
                };
                match next {
                    Some((pv, tv)) => {
                        self.branch.move_down(pv, tv);
                        if self.branch.reduce_current_node(&mut self.problem, max_weight) {
                            StepOutcome::Continue
                        } else {
                            self.backtrack(max_weight, monitor)
                        }
                    }
                    None => {
                        self.phase = SearchPhase::AtSolution;
                        StepOutcome::Solution
                    }
                }
            }
            SearchPhase::AtSolution => self.backtrack(max_weight, monitor),
            SearchPhase::Exhausted => StepOutcome::Exhausted,
        }
    }

    /// Pops suggestions until one can be branched on at the current node.
    fn next_suggestion(&mut self) -> Option<Assignment> {
        while let Some((pv, tv)) = self.suggestions.pop_front() {
            if self.branch.can_move_down(pv, tv) {
                trace!(pv, tv, "following suggested assignment");
                return Some((pv, tv));
            }
        }
        None
    }

    fn backtrack<M>(&mut self, max_weight: WeightWsm, monitor: &mut M) -> StepOutcome
    where
        M: SearchMonitor + ?Sized,
    {
        self.suggestions.clear();
        if self.branch.backtrack(&mut self.problem, max_weight) {
            monitor.on_backtrack(self.branch.statistics());
            self.phase = SearchPhase::AtValidNode;
            StepOutcome::Continue
        } else {
            self.phase = SearchPhase::Exhausted;
            StepOutcome::Exhausted
        }
    }
}

#[derive(Debug)]
pub struct MainSolver {
    pattern_relabelling: VertexRelabelling,
    target_relabelling: VertexRelabelling,
    search: Option<ActiveSearch>,
    /// Solutions here use the relabeled vertex ids.
    solution_data: SolutionData,
    weight_upper_bound_constraint: Option<WeightWsm>,
}

impl MainSolver {
    /// Validates both graphs and prepares the search.
    ///
    /// Trivially infeasible problems are detected here and leave the solver
    /// finished with no solutions; an edgeless pattern leaves it finished
    /// with one empty solution.
    pub fn new(
        pattern: &GraphEdgeWeights,
        target: &GraphEdgeWeights,
        params: &MainSolverParameters,
    ) -> Result<Self, SolverError> {
        let start = Instant::now();
        check_edge_weights(pattern, EdgeCheckOptions::strict()).map_err(SolverError::InvalidPattern)?;
        check_edge_weights(target, EdgeCheckOptions::strict()).map_err(SolverError::InvalidTarget)?;

        let mut solver = Self {
            pattern_relabelling: VertexRelabelling::new(pattern),
            target_relabelling: VertexRelabelling::new(target),
            search: None,
            solution_data: SolutionData::default(),
            weight_upper_bound_constraint: params.weight_upper_bound_constraint,
        };
        solver.initialise(params)?;
        solver.solution_data.initialisation_time_ms = elapsed_ms(start);
        Ok(solver)
    }

    fn initialise(&mut self, params: &MainSolverParameters) -> Result<(), SolverError> {
        let pattern_edges = self.pattern_relabelling.new_edges_and_weights();
        let target_edges = self.target_relabelling.new_edges_and_weights();
        debug!(
            pattern_vertices = self.pattern_relabelling.number_of_vertices(),
            pattern_edges = pattern_edges.len(),
            target_vertices = self.target_relabelling.number_of_vertices(),
            target_edges = target_edges.len(),
            "initialising solver"
        );

        if pattern_edges.is_empty() {
            self.solution_data.solutions.push(SolutionWsm::default());
            self.solution_data.finished = true;
            return Ok(());
        }
        if self.pattern_relabelling.number_of_vertices() > self.target_relabelling.number_of_vertices()
            || pattern_edges.len() > target_edges.len()
        {
            debug!("pattern is larger than target");
            self.solution_data.finished = true;
            return Ok(());
        }

        let (lower, upper) = trivial_weight_bounds(pattern_edges, target_edges)?;
        self.solution_data.trivial_weight_lower_bound = lower;
        self.solution_data.trivial_weight_initial_upper_bound = upper;
        debug!(lower, upper, "trivial weight bounds");
        if let Some(constraint) = params.weight_upper_bound_constraint
            && constraint < lower
        {
            debug!(constraint, lower, "weight constraint is below the trivial lower bound");
            self.solution_data.finished = true;
            return Ok(());
        }

        let pattern = NeighboursData::new(pattern_edges).map_err(SolverError::InvalidPattern)?;
        let target = NeighboursData::new(target_edges).map_err(SolverError::InvalidTarget)?;
        let mut problem = ProblemData::new(pattern, target);

        let mut domains = Vec::new();
        let feasible = DomainInitialiser::new().full_initialisation(
            &mut domains,
            &problem.pattern,
            &mut problem.pattern_near,
            &problem.target,
            &mut problem.target_near,
            params.max_distance_for_domain_initialisation_distance_filter,
        );
        if !feasible {
            debug!("domain initialisation found an empty domain");
            self.solution_data.finished = true;
            return Ok(());
        }
        debug!(
            total_domain_size = domains.iter().map(|d| d.count_ones(..)).sum::<usize>(),
            "root domains initialised"
        );

        let mut branch = SearchBranch::new(
            domains,
            &problem,
            params.max_distance_for_distance_reduction_during_search,
        );
        if problem.target_is_complete {
            debug!("complete target, branching by weight");
        }
        if lower != upper {
            let valid = branch.activate_weight_nogood_detector();
            debug!(valid_target_vertices = valid, "weight nogood detector active");
        }

        let suggestions: VecDeque<Assignment> = params
            .suggested_assignments
            .iter()
            .filter_map(|&(pv, tv)| {
                Some((
                    self.pattern_relabelling.old_to_new(pv)?,
                    self.target_relabelling.old_to_new(tv)?,
                ))
            })
            .collect();
        if !params.suggested_assignments.is_empty() {
            debug!(
                given = params.suggested_assignments.len(),
                usable = suggestions.len(),
                "suggested assignments"
            );
        }

        self.search = Some(ActiveSearch {
            problem,
            branch,
            rng: ChaCha8Rng::seed_from_u64(params.random_seed),
            phase: SearchPhase::Root,
            suggestions,
        });
        Ok(())
    }

    /// Returns `true` once no further (better) solution can be found.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.solution_data.finished
    }

    /// Runs the search within the budgets of `params`.
    #[inline]
    pub fn solve(&mut self, params: &MainSolverParameters) -> Result<(), SolverError> {
        self.solve_with_monitor(params, &mut NoOperationMonitor::new())
    }

    /// As [`solve`](Self::solve), also reporting to `monitor`, which may
    /// stop the call early.
    pub fn solve_with_monitor<M>(
        &mut self,
        params: &MainSolverParameters,
        monitor: &mut M,
    ) -> Result<(), SolverError>
    where
        M: SearchMonitor + ?Sized,
    {
        if self.solution_data.finished {
            return Ok(());
        }
        let Self {
            pattern_relabelling,
            target_relabelling,
            search,
            solution_data,
            weight_upper_bound_constraint,
        } = self;
        let Some(search) = search.as_mut() else {
            solution_data.finished = true;
            return Ok(());
        };

        let start = Instant::now();
        let mut monitors = CompositeSearchMonitor::with_capacity(3);
        monitors.add_monitor(TimeLimitMonitor::with_clock_check_mask(
            Duration::from_millis(params.timeout_ms),
            0,
        ));
        monitors.add_monitor(IterationLimitMonitor::new(params.iterations_timeout));
        monitors.add_monitor(monitor);
        debug!(
            timeout_ms = params.timeout_ms,
            iterations_timeout = params.iterations_timeout,
            "search call started"
        );
        monitors.on_enter_search(search.branch.statistics());

        let mut result = Ok(());
        let stop_reason = loop {
            monitors.on_step(search.branch.statistics());
            if let SearchCommand::Terminate(reason) = monitors.search_command() {
                break reason;
            }
            let Some(max_weight) =
                current_max_weight(solution_data, params, *weight_upper_bound_constraint)
            else {
                solution_data.finished = true;
                break "no better solution is possible".to_string();
            };

            search.branch.statistics_mut().on_iteration();
            solution_data.iterations = solution_data.iterations.saturating_add(1);

            match search.advance(max_weight, &mut monitors) {
                StepOutcome::Continue => {}
                StepOutcome::Exhausted => {
                    solution_data.finished = true;
                    break "search tree exhausted".to_string();
                }
                StepOutcome::Solution => {
                    let assignments = search.branch.get_assignments();
                    let solution = match SolutionWsm::from_assignments(
                        pattern_relabelling.new_edges_and_weights(),
                        target_relabelling.new_edges_and_weights(),
                        assignments,
                    ) {
                        Ok(solution) => solution,
                        Err(error) => {
                            result = Err(SolverError::InvalidSolution(error));
                            break "invalid solution".to_string();
                        }
                    };
                    debug_assert!(
                        solution.scalar_product <= max_weight,
                        "called `MainSolver::solve` and got scalar product {} above the bound {}",
                        solution.scalar_product,
                        max_weight
                    );
                    debug_assert_eq!(
                        (solution.scalar_product, solution.total_p_edges_weight),
                        (
                            search.branch.get_scalar_product(),
                            search.branch.get_total_p_edge_weights()
                        ),
                        "incremental weights disagree with the recomputed solution"
                    );
                    trace!(
                        scalar_product = solution.scalar_product,
                        iteration = solution_data.iterations,
                        "solution found"
                    );
                    search.branch.statistics_mut().on_solution_found();
                    monitors.on_solution_found(&solution, search.branch.statistics());

                    if params.single_best_solution_only() {
                        solution_data.solutions.clear();
                    }
                    solution_data.solutions.push(solution);

                    if params.terminate_with_first_full_solution {
                        solution_data.finished = true;
                        break "first full solution found".to_string();
                    }
                    if !params.single_best_solution_only()
                        && solution_data.solutions.len()
                            >= params.for_multiple_full_solutions_the_max_number_to_obtain
                    {
                        solution_data.finished = true;
                        break "requested number of solutions found".to_string();
                    }
                }
            }
        };

        solution_data.search_time_ms = solution_data
            .search_time_ms
            .saturating_add(elapsed_ms(start));
        solution_data.statistics = search.branch.statistics().clone();
        monitors.on_exit_search(search.branch.statistics());
        if solution_data.finished {
            info!(
                solutions = solution_data.solutions.len(),
                iterations = solution_data.iterations,
                search_time_ms = solution_data.search_time_ms,
                reason = %stop_reason,
                "search finished"
            );
        } else {
            debug!(
                solutions = solution_data.solutions.len(),
                iterations = solution_data.iterations,
                reason = %stop_reason,
                "search call stopped"
            );
        }
        result
    }

    /// Returns the results so far, in the caller's vertex ids.
    pub fn get_solution_data(&self) -> SolutionData {
        let mut data = self.solution_data.clone();
        if let Some(search) = &self.search {
            data.statistics = search.branch.statistics().clone();
        }
        if !(self.pattern_relabelling.is_identity() && self.target_relabelling.is_identity()) {
            for solution in &mut data.solutions {
                solution.assignments = self.relabel_assignments(&solution.assignments);
            }
        }
        data
    }

    /// Returns the search counters so far.
    pub fn statistics(&self) -> SearchStatistics {
        self.search
            .as_ref()
            .map_or_else(SearchStatistics::default, |search| {
                search.branch.statistics().clone()
            })
    }

    fn relabel_assignments(&self, assignments: &[Assignment]) -> Vec<Assignment> {
        let mut relabelled: Vec<Assignment> = assignments
            .iter()
            .filter_map(|&(pv, tv)| {
                Some((
                    self.pattern_relabelling.new_to_old(pv)?,
                    self.target_relabelling.new_to_old(tv)?,
                ))
            })
            .collect();
        relabelled.sort_unstable();
        relabelled
    }
}

/// Returns the largest scalar product the next solution may have, or `None`
/// if no acceptable solution can exist any more.
fn current_max_weight(
    solution_data: &SolutionData,
    params: &MainSolverParameters,
    weight_upper_bound_constraint: Option<WeightWsm>,
) -> Option<WeightWsm> {
    let upper = weight_upper_bound_constraint.map_or(
        solution_data.trivial_weight_initial_upper_bound,
        |constraint| constraint.min(solution_data.trivial_weight_initial_upper_bound),
    );
    if !params.single_best_solution_only() {
        return Some(upper);
    }
    let Some(best) = solution_data.solutions.first() else {
        return Some(upper);
    };
    let improved = best.scalar_product.checked_sub(1)?;
    if improved < solution_data.trivial_weight_lower_bound {
        return None;
    }
    Some(improved.min(upper))
}

/// Returns the trivial `(lower, upper)` bounds on the scalar product. The
/// target must have at least as many edges as the pattern.
fn trivial_weight_bounds(
    pattern: &GraphEdgeWeights,
    target: &GraphEdgeWeights,
) -> Result<(WeightWsm, WeightWsm), IntegerOverflow> {
    let mut p_weights: Vec<WeightWsm> = pattern.values().copied().collect();
    let mut t_weights: Vec<WeightWsm> = target.values().copied().collect();
    p_weights.sort_unstable();
    t_weights.sort_unstable();
    let k = p_weights.len().min(t_weights.len());

    let lower = get_sum_of_products_or_overflow(
        p_weights.iter().copied(),
        t_weights[..k].iter().rev().copied(),
    )?;
    let upper = get_sum_of_products_or_overflow(
        p_weights.iter().copied(),
        t_weights[t_weights.len() - k..].iter().copied(),
    )?;
    Ok((lower, upper))
}

#[inline]
fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use wsm_graph::{
        types::{get_edge, get_edge_weight, get_vertices},
        validation::GraphError,
    };

    fn graph(edges: &[(usize, usize, WeightWsm)]) -> GraphEdgeWeights {
        edges
            .iter()
            .map(|&(v1, v2, weight)| (get_edge(v1, v2), weight))
            .collect()
    }

    fn solve_once(
        pattern: &GraphEdgeWeights,
        target: &GraphEdgeWeights,
        params: &MainSolverParameters,
    ) -> SolutionData {
        let mut solver = MainSolver::new(pattern, target, params).unwrap();
        solver.solve(params).unwrap();
        solver.get_solution_data()
    }

    /// Every monomorphism with its scalar product, by exhaustive search.
    fn brute_force(pattern: &GraphEdgeWeights, target: &GraphEdgeWeights) -> Vec<WeightWsm> {
        fn extend(
            pattern: &GraphEdgeWeights,
            target: &GraphEdgeWeights,
            p_vertices: &[usize],
            t_vertices: &[usize],
            images: &mut Vec<usize>,
            found: &mut Vec<WeightWsm>,
        ) {
            if images.len() == p_vertices.len() {
                let image = |pv: usize| images[p_vertices.binary_search(&pv).unwrap()];
                let mut scalar_product = 0;
                for (&(p1, p2), &weight) in pattern {
                    match get_edge_weight(target, image(p1), image(p2)) {
                        Some(t_weight) => scalar_product += weight * t_weight,
                        None => return,
                    }
                }
                found.push(scalar_product);
                return;
            }
            for &tv in t_vertices {
                if !images.contains(&tv) {
                    images.push(tv);
                    extend(pattern, target, p_vertices, t_vertices, images, found);
                    images.pop();
                }
            }
        }

        let mut found = Vec::new();
        extend(
            pattern,
            target,
            &get_vertices(pattern),
            &get_vertices(target),
            &mut Vec::new(),
            &mut found,
        );
        found
    }

    fn random_graph(
        rng: &mut ChaCha8Rng,
        number_of_vertices: usize,
        edge_probability: f64,
        max_weight: WeightWsm,
    ) -> GraphEdgeWeights {
        let mut edges = GraphEdgeWeights::new();
        for v1 in 0..number_of_vertices {
            for v2 in (v1 + 1)..number_of_vertices {
                if rng.random_bool(edge_probability) {
                    edges.insert((v1, v2), rng.random_range(1..=max_weight));
                }
            }
        }
        edges
    }

    fn signature(solution: &SolutionWsm) -> String {
        solution
            .assignments
            .iter()
            .map(|&(_, tv)| tv.to_string())
            .collect()
    }

    #[test]
    fn test_all_self_embeddings_of_six_vertex_graph() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let edges = graph(&[(0, 1, 1), (1, 3, 1), (0, 3, 1), (1, 2, 1), (2, 4, 1), (2, 5, 1)]);
        let params = MainSolverParameters::new()
            .with_timeout_ms(10)
            .with_max_number_of_solutions(10);
        let data = solve_once(&edges, &edges, &params);

        assert!(data.finished);
        let mut signatures: Vec<String> = data.solutions.iter().map(signature).collect();
        signatures.sort();
        assert_eq!(signatures, vec!["012345", "012354", "312045", "312054"]);
        assert!(data.solutions.iter().all(|s| s.scalar_product == 6));
        assert!(data.solutions.iter().all(|s| s.total_p_edges_weight == 6));
        assert_eq!(data.trivial_weight_lower_bound, 6);
        assert_eq!(data.trivial_weight_initial_upper_bound, 6);
    }

    #[test]
    fn test_more_pattern_edges_than_target_edges() {
        let pattern = graph(&[(0, 1, 1), (1, 2, 1), (0, 2, 1)]);
        let target = graph(&[(0, 1, 1), (1, 2, 1)]);
        let solver = MainSolver::new(&pattern, &target, &MainSolverParameters::default()).unwrap();
        assert!(solver.is_finished());
        let data = solver.get_solution_data();
        assert!(data.solutions.is_empty());
        assert_eq!(data.iterations, 0);
    }

    #[test]
    fn test_domain_initialisation_detects_infeasibility() {
        // A star with three leaves cannot embed into a 4-cycle.
        let pattern = graph(&[(0, 1, 1), (0, 2, 1), (0, 3, 1)]);
        let target = graph(&[(0, 1, 1), (1, 2, 1), (2, 3, 1), (0, 3, 1)]);
        let data = solve_once(&pattern, &target, &MainSolverParameters::default());
        assert!(data.finished);
        assert!(data.solutions.is_empty());
    }

    #[test]
    fn test_edgeless_pattern_has_the_empty_solution() {
        let target = graph(&[(0, 1, 4)]);
        let data = solve_once(&GraphEdgeWeights::new(), &target, &MainSolverParameters::default());
        assert!(data.finished);
        assert_eq!(data.solutions, vec![SolutionWsm::default()]);
    }

    #[test]
    fn test_invalid_graphs_are_rejected() {
        let valid = graph(&[(0, 1, 1)]);
        let zero_weight: GraphEdgeWeights = [((0, 1), 0)].into_iter().collect();
        let self_loop: GraphEdgeWeights = [((2, 2), 1)].into_iter().collect();
        let params = MainSolverParameters::default();
        assert_eq!(
            MainSolver::new(&zero_weight, &valid, &params).err(),
            Some(SolverError::InvalidPattern(GraphError::ZeroWeight { v1: 0, v2: 1 }))
        );
        assert_eq!(
            MainSolver::new(&valid, &self_loop, &params).err(),
            Some(SolverError::InvalidTarget(GraphError::SelfLoop {
                vertex: 2,
                weight: 1
            }))
        );
    }

    #[test]
    fn test_trivial_bounds_use_rearrangement() {
        let pattern = graph(&[(0, 1, 1), (1, 2, 3)]);
        let target = graph(&[(0, 1, 2), (1, 2, 5), (2, 3, 7), (3, 4, 11)]);
        // Lower: 1*5 + 3*2. Upper: 1*7 + 3*11.
        assert_eq!(trivial_weight_bounds(&pattern, &target), Ok((11, 40)));

        let huge = graph(&[(0, 1, WeightWsm::MAX)]);
        assert!(trivial_weight_bounds(&huge, &graph(&[(0, 1, 2)])).is_err());
        assert!(matches!(
            MainSolver::new(&huge, &graph(&[(0, 1, 2)]), &MainSolverParameters::default()),
            Err(SolverError::Overflow(_))
        ));
    }

    #[test]
    fn test_single_best_policy_finds_the_optimum() {
        // Path into a weighted triangle: scalar products 3, 4 and 5.
        let pattern = graph(&[(0, 1, 1), (1, 2, 1)]);
        let target = graph(&[(0, 1, 1), (1, 2, 2), (0, 2, 3)]);
        let data = solve_once(&pattern, &target, &MainSolverParameters::new().with_timeout_ms(10_000));
        assert!(data.finished);
        assert_eq!(data.solutions.len(), 1);
        assert_eq!(data.solutions[0].scalar_product, 3);
        assert_eq!(data.trivial_weight_lower_bound, 3);
        assert_eq!(data.trivial_weight_initial_upper_bound, 5);
    }

    #[test]
    fn test_weight_constraint_limits_solutions() {
        let pattern = graph(&[(0, 1, 1), (1, 2, 1)]);
        let target = graph(&[(0, 1, 1), (1, 2, 2), (0, 2, 3)]);
        let params = MainSolverParameters::new()
            .with_timeout_ms(10_000)
            .with_max_number_of_solutions(100)
            .with_weight_upper_bound_constraint(4);
        let data = solve_once(&pattern, &target, &params);
        assert!(data.finished);
        assert_eq!(data.solutions.len(), 4);
        assert!(data.solutions.iter().all(|s| s.scalar_product <= 4));

        let below_lower = params.clone().with_weight_upper_bound_constraint(2);
        let solver = MainSolver::new(&pattern, &target, &below_lower).unwrap();
        assert!(solver.is_finished());
        assert!(solver.get_solution_data().solutions.is_empty());
    }

    #[test]
    fn test_solutions_use_original_vertex_ids() {
        let pattern = graph(&[(10, 20, 2), (20, 30, 3)]);
        let target = graph(&[(5, 7, 1), (7, 9, 4), (9, 11, 2)]);
        let params = MainSolverParameters::new()
            .with_timeout_ms(10_000)
            .with_max_number_of_solutions(100);
        let data = solve_once(&pattern, &target, &params);

        assert!(data.finished);
        assert_eq!(data.solutions.len(), brute_force(&pattern, &target).len());
        for solution in &data.solutions {
            assert!(solution.check(&pattern, &target).is_ok(), "{}", solution);
            assert!(solution.target_of(20).is_some());
        }
    }

    #[test]
    fn test_terminate_with_first_full_solution() {
        let k4 = graph(&[(0, 1, 1), (0, 2, 1), (0, 3, 1), (1, 2, 1), (1, 3, 1), (2, 3, 1)]);
        let triangle = graph(&[(0, 1, 1), (1, 2, 1), (0, 2, 1)]);
        let params = MainSolverParameters::new()
            .with_timeout_ms(10_000)
            .with_max_number_of_solutions(100)
            .with_terminate_with_first_full_solution(true);
        let data = solve_once(&triangle, &k4, &params);
        assert!(data.finished);
        assert_eq!(data.solutions.len(), 1);
        assert_eq!(data.statistics.solutions_found, 1);
    }

    #[test]
    fn test_cross_check_against_brute_force() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        for round in 0..40 {
            let pattern = random_graph(&mut rng, 4, 0.6, 3);
            let target = random_graph(&mut rng, 6, 0.5, 3);
            if pattern.is_empty() {
                continue;
            }
            let expected = brute_force(&pattern, &target);

            let all = MainSolverParameters::new()
                .with_timeout_ms(60_000)
                .with_max_number_of_solutions(10_000)
                .with_random_seed(round);
            let data = solve_once(&pattern, &target, &all);
            assert!(data.finished, "round {}", round);
            assert_eq!(data.solutions.len(), expected.len(), "round {}", round);
            for solution in &data.solutions {
                assert!(solution.check(&pattern, &target).is_ok(), "round {}", round);
            }

            let best = MainSolverParameters::new()
                .with_timeout_ms(60_000)
                .with_random_seed(round);
            let data = solve_once(&pattern, &target, &best);
            assert!(data.finished, "round {}", round);
            assert_eq!(
                data.solutions.first().map(|s| s.scalar_product),
                expected.iter().copied().min(),
                "round {}",
                round
            );
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let pattern = random_graph(&mut rng, 5, 0.6, 5);
        let target = random_graph(&mut rng, 8, 0.6, 5);
        let params = MainSolverParameters::new()
            .with_timeout_ms(60_000)
            .with_max_number_of_solutions(50)
            .with_random_seed(17);

        let first = solve_once(&pattern, &target, &params);
        let second = solve_once(&pattern, &target, &params);
        assert_eq!(first.solutions, second.solutions);
        assert_eq!(first.iterations, second.iterations);
        assert_eq!(first.statistics, second.statistics);
        assert_eq!(first.trivial_weight_lower_bound, second.trivial_weight_lower_bound);
    }

    #[test]
    fn test_resumes_across_short_calls() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let pattern = random_graph(&mut rng, 4, 0.7, 4);
        let target = random_graph(&mut rng, 7, 0.6, 4);
        let params = MainSolverParameters::new()
            .with_timeout_ms(60_000)
            .with_random_seed(3);
        let one_shot = solve_once(&pattern, &target, &params);

        let short = params.clone().with_iterations_timeout(1);
        let mut solver = MainSolver::new(&pattern, &target, &short).unwrap();
        let mut calls = 0;
        while !solver.is_finished() {
            solver.solve(&short).unwrap();
            calls += 1;
            assert_eq!(solver.get_solution_data().iterations, calls.min(one_shot.iterations));
        }
        let resumed = solver.get_solution_data();
        assert_eq!(resumed.solutions, one_shot.solutions);
        assert_eq!(resumed.iterations, one_shot.iterations);
    }

    #[test]
    fn test_monitor_can_stop_the_search() {
        struct StopAtFirstSolution {
            solutions: usize,
            backtracks: usize,
        }

        impl SearchMonitor for StopAtFirstSolution {
            fn name(&self) -> &str {
                "StopAtFirstSolution"
            }
            fn on_enter_search(&mut self, _statistics: &SearchStatistics) {}
            fn on_exit_search(&mut self, _statistics: &SearchStatistics) {}
            fn on_solution_found(&mut self, _solution: &SolutionWsm, _statistics: &SearchStatistics) {
                self.solutions += 1;
            }
            fn on_step(&mut self, _statistics: &SearchStatistics) {}
            fn on_backtrack(&mut self, _statistics: &SearchStatistics) {
                self.backtracks += 1;
            }
            fn search_command(&self) -> SearchCommand {
                if self.solutions > 0 {
                    SearchCommand::Terminate("stop".to_string())
                } else {
                    SearchCommand::Continue
                }
            }
        }

        let k4 = graph(&[(0, 1, 1), (0, 2, 1), (0, 3, 1), (1, 2, 1), (1, 3, 1), (2, 3, 1)]);
        let triangle = graph(&[(0, 1, 1), (1, 2, 1), (0, 2, 1)]);
        let params = MainSolverParameters::new()
            .with_timeout_ms(10_000)
            .with_max_number_of_solutions(100);
        let mut solver = MainSolver::new(&triangle, &k4, &params).unwrap();
        let mut monitor = StopAtFirstSolution {
            solutions: 0,
            backtracks: 0,
        };
        solver.solve_with_monitor(&params, &mut monitor).unwrap();
        assert!(!solver.is_finished());
        assert_eq!(solver.get_solution_data().solutions.len(), 1);

        monitor.solutions = 0;
        solver.solve_with_monitor(&params, &mut monitor).unwrap();
        assert_eq!(solver.get_solution_data().solutions.len(), 2);
        assert!(monitor.backtracks > 0);
    }

    #[test]
    fn test_zero_timeout_performs_no_iterations() {
        let k4 = graph(&[(0, 1, 1), (0, 2, 1), (0, 3, 1), (1, 2, 1), (1, 3, 1), (2, 3, 1)]);
        let triangle = graph(&[(0, 1, 1), (1, 2, 1), (0, 2, 1)]);
        let params = MainSolverParameters::new()
            .with_timeout_ms(0)
            .with_max_number_of_solutions(100);
        let mut solver = MainSolver::new(&triangle, &k4, &params).unwrap();
        solver.solve(&params).unwrap();
        let data = solver.get_solution_data();
        assert_eq!(data.iterations, 0);
        assert!(data.solutions.is_empty());
        assert!(!solver.is_finished());

        solver.solve(&params.clone().with_timeout_ms(10_000)).unwrap();
        assert!(solver.is_finished());
        assert_eq!(solver.get_solution_data().solutions.len(), 24);
    }

    #[test]
    fn test_suggestions_steer_the_first_solution() {
        let pattern = graph(&[(10, 20, 1), (20, 30, 1), (10, 30, 1)]);
        let target = graph(&[(1, 3, 1), (1, 5, 1), (1, 7, 1), (3, 5, 1), (3, 7, 1), (5, 7, 1)]);
        // (10, 99) names an unknown vertex; (20, 7) clashes with (10, 7).
        let params = MainSolverParameters::new()
            .with_timeout_ms(10_000)
            .with_max_number_of_solutions(100)
            .with_terminate_with_first_full_solution(true)
            .with_suggested_assignments(vec![(10, 99), (10, 7), (20, 7), (20, 5)]);
        for seed in 0..5 {
            let data = solve_once(&pattern, &target, &params.clone().with_random_seed(seed));
            assert_eq!(data.solutions.len(), 1);
            let solution = &data.solutions[0];
            assert_eq!(solution.target_of(10), Some(7));
            assert_eq!(solution.target_of(20), Some(5));
            assert!(matches!(solution.target_of(30), Some(1) | Some(3)));
            assert_eq!(data.statistics.backtracks, 0, "seed {}", seed);
        }
    }

    #[test]
    fn test_bad_suggestions_do_not_lose_the_optimum() {
        // Putting p1 on t2 gives the worst scalar product, 5.
        let pattern = graph(&[(0, 1, 1), (1, 2, 1)]);
        let target = graph(&[(0, 1, 1), (1, 2, 2), (0, 2, 3)]);
        let params = MainSolverParameters::new()
            .with_timeout_ms(10_000)
            .with_suggested_assignments(vec![(1, 2)]);
        let data = solve_once(&pattern, &target, &params);
        assert!(data.finished);
        assert_eq!(data.solutions.len(), 1);
        assert_eq!(data.solutions[0].scalar_product, 3);
        assert!(data.statistics.solutions_found >= 2);
    }

    #[test]
    fn test_complete_targets_against_brute_force() {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        for round in 0..15 {
            let pattern = random_graph(&mut rng, 4, 0.6, 4);
            let target = random_graph(&mut rng, 6, 1.0, 5);
            if pattern.is_empty() {
                continue;
            }
            let expected = brute_force(&pattern, &target);

            let all = MainSolverParameters::new()
                .with_timeout_ms(60_000)
                .with_max_number_of_solutions(10_000)
                .with_random_seed(round);
            let data = solve_once(&pattern, &target, &all);
            assert!(data.finished, "round {}", round);
            assert_eq!(data.solutions.len(), expected.len(), "round {}", round);

            let best = MainSolverParameters::new()
                .with_timeout_ms(60_000)
                .with_random_seed(round);
            let data = solve_once(&pattern, &target, &best);
            assert!(data.finished, "round {}", round);
            assert_eq!(
                data.solutions.first().map(|s| s.scalar_product),
                expected.iter().copied().min(),
                "round {}",
                round
            );
        }
    }
}
