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

//! WSM search: domains, reducers and the depth-first branch
//!
//! Everything that mutates domains lives here. The driver in `wsm-solver`
//! owns one [`branch::SearchBranch`] per problem and steers it; this crate
//! never decides when to stop.
//!
//! Core flow
//! - Build a [`problem::ProblemData`] from the pattern and target graphs.
//! - Fill root domains with [`domain_init::DomainInitialiser`].
//! - Create a [`branch::SearchBranch`] and alternate reduce, choose,
//!   move down and backtrack.
//!
//! Design highlights
//! - Domains are change-logged per pattern vertex (`tree::store`), so nodes
//!   that do not touch a vertex share its domain.
//! - Reducers are a closed enum (`reducers::Reducer`), dispatched by match.
//! - Tie-breaking draws from a caller-provided, seedable generator.
//!
//! Module map
//! - `branch`: the search branch state machine.
//! - `branching`: variable and value ordering, and weight-driven branching
//!   for complete targets.
//! - `domain_init`: degree and distance filters for root domains.
//! - `problem`: the graphs and their lazy caches.
//! - `reducers`: per-assignment and whole-node reducers.
//! - `stats`: search counters.
//! - `tree`: the domain store and its two views.

pub mod branch;
pub mod branching;
pub mod domain_init;
pub mod problem;
pub mod reducers;
pub mod stats;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_utils;
