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

//! # WSM Graph
//!
//! **The graph model of the weighted subgraph monomorphism engine.**
//!
//! Callers hand the engine two undirected graphs as edge maps
//! (`GraphEdgeWeights`, smaller vertex first, positive weights). This crate
//! validates them, renumbers them densely, and derives the read-mostly query
//! structures the search consults millions of times.
//!
//! ## Architecture
//!
//! * **`types`**: `VertexWsm`, `WeightWsm`, `EdgeWsm`, `GraphEdgeWeights`.
//! * **`validation`**: `GraphError` and the edge-map invariants (no self-loops,
//!   no zero weights, no reversed keys, no contradictory duplicates).
//! * **`relabel`**: `VertexRelabelling`, dense renumbering and its inverse.
//! * **`neighbours`**: `NeighboursData`, sorted adjacency with O(1) edge lookup.
//! * **`near_neighbours`**: `NearNeighboursData`, lazily cached BFS layers.
//! * **`derived`**: `DerivedGraphData`, common-neighbour counts.
//! * **`solution`**: `SolutionWsm` and its independent validation.
//!
//! ## Design Philosophy
//!
//! 1.  **Fail-Fast**: malformed graphs are rejected at construction, naming
//!     the offending edge.
//! 2.  **Immutable inputs**: once built, graphs never change, so every cache
//!     here is filled lazily and never invalidated.
//! 3.  **Checked weights**: every sum and product goes through
//!     `wsm_core::num::checked`.

pub mod derived;
pub mod near_neighbours;
pub mod neighbours;
pub mod relabel;
pub mod solution;
pub mod types;
pub mod validation;
