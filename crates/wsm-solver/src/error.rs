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

use thiserror::Error;
use wsm_core::num::checked::IntegerOverflow;
use wsm_graph::{solution::SolutionError, validation::GraphError};

/// Errors reported by [`MainSolver`](crate::main_solver::MainSolver).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("invalid pattern graph: {0}")]
    InvalidPattern(#[source] GraphError),
    #[error("invalid target graph: {0}")]
    InvalidTarget(#[source] GraphError),
    /// A trivial weight bound does not fit in `WeightWsm`.
    #[error(transparent)]
    Overflow(#[from] IntegerOverflow),
    /// The search reached a full assignment that fails validation.
    #[error("search produced an invalid solution: {0}")]
    InvalidSolution(#[from] SolutionError),
}
