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

use wsm_graph::{solution::SolutionWsm, types::WeightWsm};
use wsm_search::stats::SearchStatistics;

/// What the solver has found so far, with timing and bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolutionData {
    /// With a single-best policy at most one entry, otherwise in the order
    /// found.
    pub solutions: Vec<SolutionWsm>,
    /// Iterations over every `solve()` call so far.
    pub iterations: u64,
    pub initialisation_time_ms: u64,
    /// Search time over every `solve()` call so far.
    pub search_time_ms: u64,
    /// `true` iff no further (better) solution can be found.
    pub finished: bool,
    pub trivial_weight_lower_bound: WeightWsm,
    pub trivial_weight_initial_upper_bound: WeightWsm,
    pub statistics: SearchStatistics,
}

impl SolutionData {
    /// Returns the solution with the smallest scalar product.
    pub fn best_solution(&self) -> Option<&SolutionWsm> {
        self.solutions
            .iter()
            .min_by_key(|solution| solution.scalar_product)
    }
}

impl std::fmt::Display for SolutionData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SolutionData:")?;
        writeln!(f, "  Finished:                 {}", self.finished)?;
        writeln!(f, "  Solutions:                {}", self.solutions.len())?;
        match self.best_solution() {
            Some(best) => writeln!(f, "  Best scalar product:      {}", best.scalar_product)?,
            None => writeln!(f, "  Best scalar product:      none")?,
        }
        writeln!(f, "  Trivial lower bound:      {}", self.trivial_weight_lower_bound)?;
        writeln!(
            f,
            "  Trivial upper bound:      {}",
            self.trivial_weight_initial_upper_bound
        )?;
        writeln!(f, "  Iterations:               {}", self.iterations)?;
        writeln!(f, "  Initialisation (ms):      {}", self.initialisation_time_ms)?;
        writeln!(f, "  Search (ms):              {}", self.search_time_ms)?;
        write!(f, "{}", self.statistics)
    }
}
