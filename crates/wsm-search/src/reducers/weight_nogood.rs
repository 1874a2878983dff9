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

//! Weight-bound nogood detection.
//!
//! Every pattern edge that is not yet fully assigned will contribute at
//! least `p_weight * t_lower` to the scalar product, where `t_lower` is a
//! lower bound on the weight of whatever target edge it ends up on. If the
//! sum of these contributions exceeds the weight still allowed, the node is
//! a nogood.
//!
//! Target weights are bounded per target vertex: the lightest edge from
//! `tv` to another target vertex that can still be used at all.

use crate::{problem::ProblemData, tree::accessor::DomainsAccessor};
use fixedbitset::FixedBitSet;
use wsm_core::num::checked::{get_checked_product, get_checked_sum};
use wsm_graph::{
    neighbours::NeighboursData,
    types::{VertexWsm, WeightWsm},
};

/// The outcome of one weight check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightNogoodResult {
    /// No contradiction; the extra weight still needed is at least this much.
    LowerBound(WeightWsm),
    /// The remaining edges cannot fit in the allowed weight.
    Nogood,
    /// An assigned target vertex has no usable incident edge at all. Every
    /// assignment to it, in every live node, is impossible.
    InvalidTargetVertex(VertexWsm),
}

#[derive(Debug, Clone)]
pub struct WeightNogoodDetector {
    valid_target_vertices: FixedBitSet,
    /// `None` until computed; stale values stay valid lower bounds since
    /// the valid set only shrinks.
    min_t_weights: Vec<Option<WeightWsm>>,
    /// Per unassigned pattern vertex, a lower bound on the weight of any
    /// target edge at its image.
    t_weight_lower_bounds: Vec<WeightWsm>,
}

impl WeightNogoodDetector {
    /// `valid_target_vertices` must contain every target vertex that appears
    /// in some live domain.
    pub fn new(valid_target_vertices: FixedBitSet) -> Self {
        let number_of_target_vertices = valid_target_vertices.len();
        Self {
            valid_target_vertices,
            min_t_weights: vec![None; number_of_target_vertices],
            t_weight_lower_bounds: Vec::new(),
        }
    }

    #[inline]
    pub fn number_of_valid_target_vertices(&self) -> usize {
        self.valid_target_vertices.count_ones(..)
    }

    /// Returns the lightest weight of an edge from `tv` to a valid vertex,
    /// or `None` (marking `tv` invalid) if there is none.
    fn min_weight_for_tv(&mut self, tv: VertexWsm, target: &NeighboursData) -> Option<WeightWsm> {
        if !self.valid_target_vertices.contains(tv) {
            return None;
        }
        if let Some(weight) = self.min_t_weights[tv] {
            return Some(weight);
        }
        let min_weight = target
            .neighbours_and_weights(tv)
            .iter()
            .filter(|&&(other, _)| self.valid_target_vertices.contains(other))
            .map(|&(_, weight)| weight)
            .min();
        match min_weight {
            Some(weight) => self.min_t_weights[tv] = Some(weight),
            None => self.valid_target_vertices.set(tv, false),
        }
        min_weight
    }

    /// Checks whether the unassigned pattern edges can still fit within
    /// `max_extra_weight`.
    pub fn check(
        &mut self,
        accessor: &DomainsAccessor<'_>,
        problem: &ProblemData,
        max_extra_weight: WeightWsm,
    ) -> WeightNogoodResult {
        self.t_weight_lower_bounds.clear();
        self.t_weight_lower_bounds
            .resize(accessor.number_of_pattern_vertices(), 0);
        for &pv in accessor.get_unassigned_pattern_vertices_superset() {
            if accessor.get_domain_size(pv) < 2 {
                continue;
            }
            let mut lower_bound: Option<WeightWsm> = None;
            for tv in accessor.get_domain(pv).ones() {
                if let Some(weight) = self.min_weight_for_tv(tv, &problem.target) {
                    lower_bound = Some(lower_bound.map_or(weight, |bound| bound.min(weight)));
                }
            }
            let Some(lower_bound) = lower_bound else {
                return WeightNogoodResult::Nogood;
            };
            self.t_weight_lower_bounds[pv] = lower_bound;
        }

        let mut extra_weight: WeightWsm = 0;
        for &pv1 in accessor.get_unassigned_pattern_vertices_superset() {
            if accessor.get_domain_size(pv1) < 2 {
                continue;
            }
            let bound1 = self.t_weight_lower_bounds[pv1];

            for &(pv2, p_weight) in problem.pattern.neighbours_and_weights(pv1) {
                let t_weight_estimate = match accessor.get_singleton_value(pv2) {
                    Some(tv2) => match self.min_weight_for_tv(tv2, &problem.target) {
                        Some(bound2) => bound1.max(bound2),
                        None => return WeightNogoodResult::InvalidTargetVertex(tv2),
                    },
                    None => {
                        // Both ends unassigned: count the edge once.
                        if pv1 > pv2 {
                            continue;
                        }
                        bound1.max(self.t_weight_lower_bounds[pv2])
                    }
                };
                let Some(sum) = get_checked_product(p_weight, t_weight_estimate)
                    .and_then(|product| get_checked_sum(extra_weight, product))
                else {
                    return WeightNogoodResult::Nogood;
                };
                if sum > max_extra_weight {
                    return WeightNogoodResult::Nogood;
                }
                extra_weight = sum;
            }
        }
        WeightNogoodResult::LowerBound(extra_weight)
    }
}

/// Decides when the detector is worth running.
///
/// After a check that finds nothing, the next checks are skipped for a
/// doubling number of calls (capped); a detected nogood resets the skip.
#[derive(Debug, Clone, Default)]
pub struct WeightNogoodDetectorManager {
    skip_interval: u32,
    skips_remaining: u32,
}

impl WeightNogoodDetectorManager {
    const MAX_SKIP_INTERVAL: u32 = 64;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the detector should run now. An unbounded
    /// `max_weight` never activates it.
    pub fn should_activate_detector(&mut self, max_weight: WeightWsm) -> bool {
        if max_weight == WeightWsm::MAX {
            return false;
        }
        if self.skips_remaining > 0 {
            self.skips_remaining -= 1;
            return false;
        }
        true
    }

    #[inline]
    pub fn register_success(&mut self) {
        self.skip_interval = 0;
        self.skips_remaining = 0;
    }

    #[inline]
    pub fn register_lower_bound_failure(&mut self) {
        self.skip_interval = (self.skip_interval * 2).clamp(1, Self::MAX_SKIP_INTERVAL);
        self.skips_remaining = self.skip_interval;
    }
}
