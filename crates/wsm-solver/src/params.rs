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

//! Solver parameters.
//!
//! Construction uses the weight constraint, the domain-initialisation
//! distance, the search distance, the seed and the suggested assignments.
//! Each `solve()` call reads the budgets and the solution policy, so they
//! may differ between calls.

use wsm_graph::types::{Assignment, WeightWsm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainSolverParameters {
    /// Wall-clock budget of one `solve()` call.
    pub timeout_ms: u64,
    /// Iteration budget of one `solve()` call, on top of earlier calls.
    pub iterations_timeout: u64,
    pub terminate_with_first_full_solution: bool,
    /// `0` keeps only the single best solution; `n > 0` keeps up to `n`
    /// solutions of any quality.
    pub for_multiple_full_solutions_the_max_number_to_obtain: usize,
    /// Solutions with a larger scalar product are never reported.
    pub weight_upper_bound_constraint: Option<WeightWsm>,
    pub max_distance_for_domain_initialisation_distance_filter: usize,
    pub max_distance_for_distance_reduction_during_search: usize,
    /// Seeds the generator used to break ordering ties.
    pub random_seed: u64,
    /// `(pv, tv)` pairs in the caller's vertex ids, tried in order on the
    /// first descent. Unknown vertices are ignored.
    pub suggested_assignments: Vec<Assignment>,
}

impl Default for MainSolverParameters {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            iterations_timeout: u64::MAX,
            terminate_with_first_full_solution: false,
            for_multiple_full_solutions_the_max_number_to_obtain: 0,
            weight_upper_bound_constraint: None,
            max_distance_for_domain_initialisation_distance_filter: 6,
            max_distance_for_distance_reduction_during_search: 5,
            random_seed: 0,
            suggested_assignments: Vec::new(),
        }
    }
}

impl MainSolverParameters {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    #[inline]
    pub fn with_iterations_timeout(mut self, iterations_timeout: u64) -> Self {
        self.iterations_timeout = iterations_timeout;
        self
    }

    #[inline]
    pub fn with_terminate_with_first_full_solution(mut self, terminate: bool) -> Self {
        self.terminate_with_first_full_solution = terminate;
        self
    }

    #[inline]
    pub fn with_max_number_of_solutions(mut self, max_number: usize) -> Self {
        self.for_multiple_full_solutions_the_max_number_to_obtain = max_number;
        self
    }

    #[inline]
    pub fn with_weight_upper_bound_constraint(mut self, constraint: WeightWsm) -> Self {
        self.weight_upper_bound_constraint = Some(constraint);
        self
    }

    #[inline]
    pub fn with_max_distance_for_domain_initialisation(mut self, distance: usize) -> Self {
        self.max_distance_for_domain_initialisation_distance_filter = distance;
        self
    }

    #[inline]
    pub fn with_max_distance_for_distance_reduction(mut self, distance: usize) -> Self {
        self.max_distance_for_distance_reduction_during_search = distance;
        self
    }

    #[inline]
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    #[inline]
    pub fn with_suggested_assignments(mut self, suggestions: Vec<Assignment>) -> Self {
        self.suggested_assignments = suggestions;
        self
    }

    /// Returns `true` if only the single best solution is kept.
    #[inline]
    pub fn single_best_solution_only(&self) -> bool {
        self.for_multiple_full_solutions_the_max_number_to_obtain == 0
    }
}

impl std::fmt::Display for MainSolverParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "MainSolverParameters:")?;
        writeln!(f, "  Timeout (ms):             {}", self.timeout_ms)?;
        writeln!(f, "  Iterations timeout:       {}", self.iterations_timeout)?;
        writeln!(
            f,
            "  Stop at first solution:   {}",
            self.terminate_with_first_full_solution
        )?;
        writeln!(
            f,
            "  Max solutions:            {}",
            self.for_multiple_full_solutions_the_max_number_to_obtain
        )?;
        match self.weight_upper_bound_constraint {
            Some(constraint) => writeln!(f, "  Weight constraint:        {}", constraint)?,
            None => writeln!(f, "  Weight constraint:        none")?,
        }
        writeln!(
            f,
            "  Init distance filter:     {}",
            self.max_distance_for_domain_initialisation_distance_filter
        )?;
        writeln!(
            f,
            "  Search distance filter:   {}",
            self.max_distance_for_distance_reduction_during_search
        )?;
        writeln!(f, "  Random seed:              {}", self.random_seed)?;
        writeln!(
            f,
            "  Suggested assignments:    {}",
            self.suggested_assignments.len()
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_override_defaults() {
        let params = MainSolverParameters::new()
            .with_timeout_ms(10)
            .with_max_number_of_solutions(3)
            .with_weight_upper_bound_constraint(99)
            .with_random_seed(7)
            .with_suggested_assignments(vec![(0, 4), (1, 2)]);
        assert_eq!(params.timeout_ms, 10);
        assert_eq!(params.for_multiple_full_solutions_the_max_number_to_obtain, 3);
        assert_eq!(params.weight_upper_bound_constraint, Some(99));
        assert_eq!(params.random_seed, 7);
        assert_eq!(params.iterations_timeout, u64::MAX);
        assert!(!params.single_best_solution_only());
        assert!(MainSolverParameters::default().single_best_solution_only());
        assert_eq!(params.suggested_assignments, vec![(0, 4), (1, 2)]);
        assert!(MainSolverParameters::default().suggested_assignments.is_empty());
        assert!(params.to_string().contains("Weight constraint:        99"));
        assert!(params.to_string().contains("Suggested assignments:    2"));
    }
}
