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

//! Monitoring interface for the solve loop.
//!
//! Lifecycle: enter → step* (with solutions and backtracks in between) →
//! exit. A monitor stops the call by returning
//! [`SearchCommand::Terminate`] from `search_command`, which is polled once
//! per iteration after `on_step`.

use wsm_graph::solution::SolutionWsm;
use wsm_search::stats::SearchStatistics;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Trait for observing and controlling one `solve()` call.
pub trait SearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when a `solve()` call starts.
    fn on_enter_search(&mut self, statistics: &SearchStatistics);
    /// Called when a `solve()` call returns.
    fn on_exit_search(&mut self, statistics: &SearchStatistics);
    /// Called for every recorded solution, in the caller's vertex numbering
    /// of the relabeled graphs.
    fn on_solution_found(&mut self, solution: &SolutionWsm, statistics: &SearchStatistics);
    /// Called once per iteration, before `search_command`.
    fn on_step(&mut self, statistics: &SearchStatistics);
    /// Called after every backtrack.
    fn on_backtrack(&mut self, _statistics: &SearchStatistics) {}
    /// Called to determine whether the call should go on.
    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}

impl<M> SearchMonitor for &mut M
where
    M: SearchMonitor + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_enter_search(&mut self, statistics: &SearchStatistics) {
        (**self).on_enter_search(statistics);
    }

    fn on_exit_search(&mut self, statistics: &SearchStatistics) {
        (**self).on_exit_search(statistics);
    }

    fn on_solution_found(&mut self, solution: &SolutionWsm, statistics: &SearchStatistics) {
        (**self).on_solution_found(solution, statistics);
    }

    fn on_step(&mut self, statistics: &SearchStatistics) {
        (**self).on_step(statistics);
    }

    fn on_backtrack(&mut self, statistics: &SearchStatistics) {
        (**self).on_backtrack(statistics);
    }

    fn search_command(&self) -> SearchCommand {
        (**self).search_command()
    }
}

impl std::fmt::Debug for dyn SearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn SearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_command_display() {
        assert_eq!(SearchCommand::default(), SearchCommand::Continue);
        assert_eq!(SearchCommand::Continue.to_string(), "Continue");
        assert_eq!(
            SearchCommand::Terminate("budget".to_string()).to_string(),
            "Terminate: budget"
        );
    }
}
