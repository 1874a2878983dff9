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

//! Complete solutions and their independent validation.

use crate::types::{
    Assignment, EdgeWsm, GraphEdgeWeights, VertexWsm, WeightWsm, get_edge_weight, get_vertices,
};
use std::collections::BTreeMap;
use thiserror::Error;
use wsm_core::num::checked::{IntegerOverflow, get_product_or_overflow, get_sum_or_overflow};

/// Why an assignment list is not a valid weighted monomorphism.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolutionError {
    #[error("pattern vertex {pv} is not assigned")]
    UnassignedPatternVertex { pv: VertexWsm },
    #[error("pattern vertex {pv} is assigned more than once")]
    DuplicatePatternVertex { pv: VertexWsm },
    #[error("pattern vertex {pv} does not belong to the pattern graph")]
    UnknownPatternVertex { pv: VertexWsm },
    #[error("target vertex {tv} is used by more than one pattern vertex")]
    DuplicateTargetVertex { tv: VertexWsm },
    #[error("pattern edge {p_edge:?} maps to {t_edge:?}, which is not a target edge")]
    MissingTargetEdge { p_edge: EdgeWsm, t_edge: EdgeWsm },
    #[error("scalar product is {actual} but {claimed} was claimed")]
    WrongScalarProduct {
        claimed: WeightWsm,
        actual: WeightWsm,
    },
    #[error("total pattern edge weight is {actual} but {claimed} was claimed")]
    WrongTotalPatternWeight {
        claimed: WeightWsm,
        actual: WeightWsm,
    },
    #[error(transparent)]
    Overflow(#[from] IntegerOverflow),
}

/// A complete assignment with its objective values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SolutionWsm {
    /// `(pv, tv)` pairs sorted by pattern vertex.
    pub assignments: Vec<Assignment>,
    pub scalar_product: WeightWsm,
    pub total_p_edges_weight: WeightWsm,
}

impl SolutionWsm {
    /// Validates `assignments` against both graphs and computes the weights
    /// from scratch.
    pub fn from_assignments(
        pattern: &GraphEdgeWeights,
        target: &GraphEdgeWeights,
        mut assignments: Vec<Assignment>,
    ) -> Result<Self, SolutionError> {
        assignments.sort_unstable();

        let mut pv_to_tv: BTreeMap<VertexWsm, VertexWsm> = BTreeMap::new();
        let mut used_tv: BTreeMap<VertexWsm, VertexWsm> = BTreeMap::new();
        for &(pv, tv) in &assignments {
            if pv_to_tv.insert(pv, tv).is_some() {
                return Err(SolutionError::DuplicatePatternVertex { pv });
            }
            if used_tv.insert(tv, pv).is_some() {
                return Err(SolutionError::DuplicateTargetVertex { tv });
            }
        }

        let pattern_vertices = get_vertices(pattern);
        for pv in &pattern_vertices {
            if !pv_to_tv.contains_key(pv) {
                return Err(SolutionError::UnassignedPatternVertex { pv: *pv });
            }
        }
        if pv_to_tv.len() != pattern_vertices.len()
            && let Some(&pv) = pv_to_tv
                .keys()
                .find(|pv| pattern_vertices.binary_search(pv).is_err())
        {
            return Err(SolutionError::UnknownPatternVertex { pv });
        }

        let mut scalar_product: WeightWsm = 0;
        let mut total_p_edges_weight: WeightWsm = 0;
        for (&(p1, p2), &p_weight) in pattern {
            let t1 = pv_to_tv[&p1];
            let t2 = pv_to_tv[&p2];
            let t_weight =
                get_edge_weight(target, t1, t2).ok_or(SolutionError::MissingTargetEdge {
                    p_edge: (p1, p2),
                    t_edge: (t1, t2),
                })?;
            scalar_product =
                get_sum_or_overflow(scalar_product, get_product_or_overflow(p_weight, t_weight)?)?;
            total_p_edges_weight = get_sum_or_overflow(total_p_edges_weight, p_weight)?;
        }

        Ok(Self {
            assignments,
            scalar_product,
            total_p_edges_weight,
        })
    }

    /// Recomputes this solution against both graphs and checks the stored
    /// weights.
    pub fn check(
        &self,
        pattern: &GraphEdgeWeights,
        target: &GraphEdgeWeights,
    ) -> Result<(), SolutionError> {
        let recomputed = Self::from_assignments(pattern, target, self.assignments.clone())?;
        if recomputed.scalar_product != self.scalar_product {
            return Err(SolutionError::WrongScalarProduct {
                claimed: self.scalar_product,
                actual: recomputed.scalar_product,
            });
        }
        if recomputed.total_p_edges_weight != self.total_p_edges_weight {
            return Err(SolutionError::WrongTotalPatternWeight {
                claimed: self.total_p_edges_weight,
                actual: recomputed.total_p_edges_weight,
            });
        }
        Ok(())
    }

    /// Returns the target vertex of `pv`, if assigned.
    pub fn target_of(&self, pv: VertexWsm) -> Option<VertexWsm> {
        self.assignments
            .binary_search_by_key(&pv, |&(p, _)| p)
            .ok()
            .map(|index| self.assignments[index].1)
    }
}

impl std::fmt::Display for SolutionWsm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolutionWsm(scalar_product: {}, total_p_edges_weight: {}, assignments: [",
            self.scalar_product, self.total_p_edges_weight
        )?;
        for (i, (pv, tv)) in self.assignments.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{pv}:{tv}")?;
        }
        write!(f, "])")
    }
}
