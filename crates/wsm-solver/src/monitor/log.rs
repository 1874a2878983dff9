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

use crate::monitor::search_monitor::SearchMonitor;
use std::time::{Duration, Instant};
use tracing::info;
use wsm_graph::{solution::SolutionWsm, types::WeightWsm};
use wsm_search::stats::SearchStatistics;

/// Emits a progress event through `tracing` at most once per
/// `log_interval`, reading the clock every `clock_check_mask + 1` steps.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    steps: u64,
    best_scalar_product: Option<WeightWsm>,
}

impl LogMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            steps: 0,
            best_scalar_product: None,
        }
    }

    #[inline]
    pub fn best_scalar_product(&self) -> Option<WeightWsm> {
        self.best_scalar_product
    }

    fn log_line(&mut self, statistics: &SearchStatistics) {
        let now = Instant::now();
        info!(
            elapsed_s = now.duration_since(self.start_time).as_secs_f32(),
            iterations = statistics.iterations,
            nodes = statistics.nodes,
            max_depth = statistics.max_depth,
            backtracks = statistics.backtracks,
            solutions = statistics.solutions_found,
            best = ?self.best_scalar_product,
            "search progress"
        );
        self.last_log_time = now;
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 255)
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {}ms, clock_check_mask: {})",
            self.log_interval.as_millis(),
            self.clock_check_mask
        )
    }
}

impl SearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, statistics: &SearchStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.steps = 0;
        info!(
            iterations = statistics.iterations,
            solutions = statistics.solutions_found,
            "search started"
        );
    }

    fn on_step(&mut self, statistics: &SearchStatistics) {
        self.steps = self.steps.wrapping_add(1);
        if (self.steps & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &SolutionWsm, _statistics: &SearchStatistics) {
        let scalar_product = solution.scalar_product;
        self.best_scalar_product = Some(
            self.best_scalar_product
                .map_or(scalar_product, |best| best.min(scalar_product)),
        );
    }

    fn on_exit_search(&mut self, statistics: &SearchStatistics) {
        self.log_line(statistics);
        info!("search stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_best_scalar_product() {
        let statistics = SearchStatistics::default();
        let mut monitor = LogMonitor::default();
        monitor.on_enter_search(&statistics);
        assert_eq!(monitor.best_scalar_product(), None);
        for scalar_product in [9, 4, 7] {
            let solution = SolutionWsm {
                scalar_product,
                ..Default::default()
            };
            monitor.on_solution_found(&solution, &statistics);
        }
        assert_eq!(monitor.best_scalar_product(), Some(4));
        monitor.on_exit_search(&statistics);
    }

    #[test]
    fn test_display() {
        let monitor = LogMonitor::new(Duration::from_millis(250), 15);
        assert_eq!(
            monitor.to_string(),
            "LogMonitor(log_interval: 250ms, clock_check_mask: 15)"
        );
    }
}
