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

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use wsm_core::num::ops::saturating_arithmetic::SaturatingAddVal;
use wsm_graph::solution::SolutionWsm;
use wsm_search::stats::SearchStatistics;

/// Stops a `solve()` call after a fixed number of iterations within that
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationLimitMonitor {
    iteration_limit: u64,
    steps: u64,
}

impl IterationLimitMonitor {
    #[inline]
    pub fn new(iteration_limit: u64) -> Self {
        Self {
            iteration_limit,
            steps: 0,
        }
    }
}

impl SearchMonitor for IterationLimitMonitor {
    fn name(&self) -> &str {
        "IterationLimitMonitor"
    }

    fn on_enter_search(&mut self, _statistics: &SearchStatistics) {
        self.steps = 0;
    }

    fn on_exit_search(&mut self, _statistics: &SearchStatistics) {}

    fn on_solution_found(&mut self, _solution: &SolutionWsm, _statistics: &SearchStatistics) {}

    #[inline(always)]
    fn on_step(&mut self, _statistics: &SearchStatistics) {
        self.steps = self.steps.saturating_add_val(1);
    }

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        if self.steps > self.iteration_limit {
            return SearchCommand::Terminate(format!(
                "iteration limit of {} reached",
                self.iteration_limit
            ));
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_exactly_the_budget() {
        let statistics = SearchStatistics::default();
        let mut monitor = IterationLimitMonitor::new(2);
        monitor.on_enter_search(&statistics);
        for _ in 0..2 {
            monitor.on_step(&statistics);
            assert_eq!(monitor.search_command(), SearchCommand::Continue);
        }
        monitor.on_step(&statistics);
        assert!(matches!(monitor.search_command(), SearchCommand::Terminate(_)));

        monitor.on_enter_search(&statistics);
        monitor.on_step(&statistics);
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_unbounded_budget_never_stops() {
        let statistics = SearchStatistics::default();
        let mut monitor = IterationLimitMonitor::new(u64::MAX);
        monitor.steps = u64::MAX - 1;
        monitor.on_step(&statistics);
        monitor.on_step(&statistics);
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
    }
}
