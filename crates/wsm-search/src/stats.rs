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

use wsm_core::num::ops::saturating_arithmetic::SaturatingAddVal;

/// Counters collected while searching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Main-loop iterations of the solver.
    pub iterations: u64,
    /// Branching decisions taken (moves down).
    pub nodes: u64,
    /// Moves back up the tree.
    pub backtracks: u64,
    /// Nodes found infeasible during reduction.
    pub nogoods: u64,
    /// Complete solutions reached.
    pub solutions_found: u64,
    /// Runs of the weight-nogood detector.
    pub weight_checker_activations: u64,
    /// Nogoods found by the weight-nogood detector.
    pub weight_checker_nogoods: u64,
    /// Hall sets used for reduction.
    pub hall_sets_found: u64,
    /// The deepest node level reached.
    pub max_depth: u64,
}

impl SearchStatistics {
    #[inline]
    pub fn on_iteration(&mut self) {
        self.iterations = self.iterations.saturating_add_val(1);
    }

    #[inline]
    pub fn on_move_down(&mut self, depth: usize) {
        self.nodes = self.nodes.saturating_add_val(1);
        self.max_depth = self.max_depth.max(depth as u64);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add_val(1);
    }

    #[inline]
    pub fn on_nogood(&mut self) {
        self.nogoods = self.nogoods.saturating_add_val(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add_val(1);
    }

    #[inline]
    pub fn on_weight_checker_activation(&mut self) {
        self.weight_checker_activations = self.weight_checker_activations.saturating_add_val(1);
    }

    #[inline]
    pub fn on_weight_checker_nogood(&mut self) {
        self.weight_checker_nogoods = self.weight_checker_nogoods.saturating_add_val(1);
    }

    #[inline]
    pub fn set_hall_sets_found(&mut self, count: u64) {
        self.hall_sets_found = count;
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "WSM Search Statistics:")?;
        writeln!(f, "  Iterations:             {}", self.iterations)?;
        writeln!(f, "  Nodes:                  {}", self.nodes)?;
        writeln!(f, "  Backtracks:             {}", self.backtracks)?;
        writeln!(f, "  Nogoods:                {}", self.nogoods)?;
        writeln!(f, "  Max depth reached:      {}", self.max_depth)?;
        writeln!(f, "  Solutions found:        {}", self.solutions_found)?;
        writeln!(f, "  Hall sets found:        {}", self.hall_sets_found)?;
        writeln!(f, "  Weight checks:          {}", self.weight_checker_activations)?;
        writeln!(f, "  Weight check nogoods:   {}", self.weight_checker_nogoods)?;
        Ok(())
    }
}
