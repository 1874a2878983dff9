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

//! Edge-map validation.
//!
//! The solver only ever accepts graphs without self-loops, zero weights or
//! reversed edge keys. Debug and printing utilities may relax these checks
//! through [`EdgeCheckOptions`]; contradictory duplicates are always rejected.

use crate::types::{GraphEdgeWeights, VertexWsm, WeightWsm, get_edge};
use thiserror::Error;

/// A violated graph invariant, naming the offending edge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("self-loop at vertex {vertex} with weight {weight}")]
    SelfLoop { vertex: VertexWsm, weight: WeightWsm },
    #[error("edge ({v1}, {v2}) has zero weight")]
    ZeroWeight { v1: VertexWsm, v2: VertexWsm },
    #[error("edge ({v1}, {v2}) violates vertex order: the smaller vertex must come first")]
    VertexOrder { v1: VertexWsm, v2: VertexWsm },
    #[error("edge ({v1}, {v2}) has contradictory weights {first} and {second}")]
    ContradictoryEdge {
        v1: VertexWsm,
        v2: VertexWsm,
        first: WeightWsm,
        second: WeightWsm,
    },
}

/// Relaxations of the edge-map checks. All `false` by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeCheckOptions {
    pub allow_zero_weights: bool,
    pub allow_self_loops: bool,
    pub allow_vertex_order_violations: bool,
}

impl EdgeCheckOptions {
    /// The checks used by the solver: nothing is allowed.
    #[inline]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Everything except contradictory duplicates is allowed.
    #[inline]
    pub fn permissive() -> Self {
        Self {
            allow_zero_weights: true,
            allow_self_loops: true,
            allow_vertex_order_violations: true,
        }
    }
}

/// Checks an edge map against the graph invariants.
pub fn check_edge_weights(
    edges_and_weights: &GraphEdgeWeights,
    options: EdgeCheckOptions,
) -> Result<(), GraphError> {
    for (&(v1, v2), &weight) in edges_and_weights {
        if v1 == v2 && !options.allow_self_loops {
            return Err(GraphError::SelfLoop { vertex: v1, weight });
        }
        if weight == 0 && !options.allow_zero_weights {
            return Err(GraphError::ZeroWeight { v1, v2 });
        }
        if v1 > v2 {
            if !options.allow_vertex_order_violations {
                return Err(GraphError::VertexOrder { v1, v2 });
            }
            if let Some(&other) = edges_and_weights.get(&(v2, v1))
                && other != weight
            {
                return Err(GraphError::ContradictoryEdge {
                    v1: v2,
                    v2: v1,
                    first: other,
                    second: weight,
                });
            }
        }
    }
    Ok(())
}

/// Builds a canonical edge map from `(v1, v2, weight)` triples.
///
/// Keys are stored with the smaller vertex first. A repeated edge with the
/// same weight is accepted; with a different weight it is an error. Unless
/// `options` allows it, a triple with `v1 > v2` is rejected before
/// canonicalisation.
pub fn edge_weights_from_triples<I>(
    triples: I,
    options: EdgeCheckOptions,
) -> Result<GraphEdgeWeights, GraphError>
where
    I: IntoIterator<Item = (VertexWsm, VertexWsm, WeightWsm)>,
{
    let mut edges_and_weights = GraphEdgeWeights::new();
    for (v1, v2, weight) in triples {
        if v1 > v2 && !options.allow_vertex_order_violations {
            return Err(GraphError::VertexOrder { v1, v2 });
        }
        let edge = get_edge(v1, v2);
        match edges_and_weights.insert(edge, weight) {
            Some(previous) if previous != weight => {
                return Err(GraphError::ContradictoryEdge {
                    v1: edge.0,
                    v2: edge.1,
                    first: previous,
                    second: weight,
                });
            }
            _ => {}
        }
    }
    check_edge_weights(&edges_and_weights, options)?;
    Ok(edges_and_weights)
}
