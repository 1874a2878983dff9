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

//! # WSM Solver
//!
//! The anytime branch-and-bound driver for weighted subgraph monomorphism:
//! find injective maps from pattern vertices to target vertices that send
//! every pattern edge onto a target edge, minimising the scalar product
//! `Σ w(p_edge) · w(image edge)`.
//!
//! ## Modules
//!
//! - `main_solver`: Construction (validation, relabeling, trivial bounds,
//!   root domains) and the resumable `solve()` loop.
//! - `params`: `MainSolverParameters` with defaults and builders.
//! - `solution_data`: Results, timings and counters.
//! - `monitor`: Time, iteration and logging monitors for one `solve()` call.
//! - `error`: `SolverError`.
//!
//! ## Usage
//!
//! ```rust
//! use wsm_graph::types::GraphEdgeWeights;
//! use wsm_solver::{main_solver::MainSolver, params::MainSolverParameters};
//!
//! let pattern: GraphEdgeWeights = [((0, 1), 2), ((1, 2), 1)].into_iter().collect();
//! let target: GraphEdgeWeights = [((0, 1), 1), ((1, 2), 3), ((0, 2), 5)].into_iter().collect();
//!
//! let params = MainSolverParameters::new().with_timeout_ms(100);
//! let mut solver = MainSolver::new(&pattern, &target, &params).unwrap();
//! solver.solve(&params).unwrap();
//!
//! let data = solver.get_solution_data();
//! assert!(data.finished);
//! assert_eq!(data.solutions[0].scalar_product, 2 * 1 + 1 * 3);
//! ```

pub mod error;
pub mod main_solver;
pub mod monitor;
pub mod params;
pub mod solution_data;
