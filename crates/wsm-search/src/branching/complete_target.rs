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

//! Branching for a complete target graph.
//!
//! When every pair of target vertices is adjacent, every injective map is a
//! monomorphism and only the weights matter. The pattern vertex with the
//! heaviest edges into the assigned vertices goes first, and takes the
//! value adding the least to the scalar product.

use crate::{branching::TieBreaker, problem::ProblemData, tree::accessor::DomainsAccessor};
use rand::Rng;
use wsm_core::num::checked::{get_checked_product, get_checked_sum};
use wsm_graph::types::{Assignment, VertexWsm, WeightWsm};

#[derive(Debug, Clone, Default)]
pub struct CompleteTargetBranching;

impl CompleteTargetBranching {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Returns the next branching decision, or `None` if every domain is a
    /// singleton.
    pub fn choose_next_assignment<R>(
        &self,
        accessor: &DomainsAccessor<'_>,
        problem: &ProblemData,
        rng: &mut R,
    ) -> Option<Assignment>
    where
        R: Rng + ?Sized,
    {
        let pv = self.choose_next_variable(accessor, problem, rng)?;
        let tv = self.choose_value(pv, accessor, problem, rng)?;
        Some((pv, tv))
    }

    /// Maximises the pattern weight into assigned vertices, then the total
    /// incident pattern weight.
    fn choose_next_variable<R>(
        &self,
        accessor: &DomainsAccessor<'_>,
        problem: &ProblemData,
        rng: &mut R,
    ) -> Option<VertexWsm>
    where
        R: Rng + ?Sized,
    {
        let mut best: Option<(WeightWsm, WeightWsm)> = None;
        let mut breaker = TieBreaker::new();
        for &pv in accessor.get_unassigned_pattern_vertices_superset() {
            if accessor.get_domain_size(pv) < 2 {
                continue;
            }
            let mut connected: WeightWsm = 0;
            let mut incident: WeightWsm = 0;
            for &(other_pv, p_weight) in problem.pattern.neighbours_and_weights(pv) {
                incident = incident.saturating_add(p_weight);
                if accessor.get_singleton_value(other_pv).is_some() {
                    connected = connected.saturating_add(p_weight);
                }
            }
            let key = (connected, incident);
            match best {
                Some(current) if key < current => {}
                Some(current) if key == current => breaker.offer(pv, rng),
                _ => {
                    best = Some(key);
                    breaker.reset(pv);
                }
            }
        }
        breaker.into_chosen()
    }

    /// Minimises the weight added by `pv -> tv`, then the lightest target
    /// edge at `tv`.
    fn choose_value<R>(
        &self,
        pv: VertexWsm,
        accessor: &DomainsAccessor<'_>,
        problem: &ProblemData,
        rng: &mut R,
    ) -> Option<VertexWsm>
    where
        R: Rng + ?Sized,
    {
        let mut best: Option<(WeightWsm, WeightWsm)> = None;
        let mut breaker = TieBreaker::new();
        for tv in accessor.get_domain(pv).ones() {
            let key = (
                added_weight(pv, tv, accessor, problem),
                problem.target.min_incident_weight(tv).unwrap_or(WeightWsm::MAX),
            );
            match best {
                Some(current) if key > current => {}
                Some(current) if key == current => breaker.offer(tv, rng),
                _ => {
                    best = Some(key);
                    breaker.reset(tv);
                }
            }
        }
        breaker.into_chosen()
    }
}

/// The scalar product increase of `pv -> tv` against the assigned
/// neighbours of `pv`, saturating at `WeightWsm::MAX`.
fn added_weight(
    pv: VertexWsm,
    tv: VertexWsm,
    accessor: &DomainsAccessor<'_>,
    problem: &ProblemData,
) -> WeightWsm {
    let mut total: WeightWsm = 0;
    for &(other_pv, p_weight) in problem.pattern.neighbours_and_weights(pv) {
        let Some(other_tv) = accessor.get_singleton_value(other_pv) else {
            continue;
        };
        let Some(sum) = problem
            .target
            .edge_weight(tv, other_tv)
            .and_then(|t_weight| get_checked_product(p_weight, t_weight))
            .and_then(|product| get_checked_sum(total, product))
        else {
            return WeightWsm::MAX;
        };
        total = sum;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{bits, problem},
        tree::store::SearchTreeStore,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const K4: [(VertexWsm, VertexWsm, WeightWsm); 6] =
        [(0, 1, 2), (0, 2, 5), (0, 3, 9), (1, 2, 7), (1, 3, 8), (2, 3, 1)];

    #[test]
    fn test_prefers_heaviest_connection_and_cheapest_value() {
        let problem = problem(&[(0, 1, 1), (1, 2, 3)], &K4);
        let mut store = SearchTreeStore::new(
            vec![bits(4, &[0, 1, 3]), bits(4, &[2]), bits(4, &[0, 1, 3])],
            4,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        // p2 weighs 3 against p1 -> t2; t3 costs 3 * 1, t0 3 * 5, t1 3 * 7.
        assert_eq!(
            CompleteTargetBranching::new().choose_next_assignment(&store.accessor(), &problem, &mut rng),
            Some((2, 3))
        );
    }

    #[test]
    fn test_without_assignments_uses_incident_weights() {
        let problem = problem(&[(0, 1, 1), (1, 2, 3)], &K4);
        let mut store = SearchTreeStore::new(vec![bits(4, &[0, 1, 2, 3]); 3], 4);
        let branching = CompleteTargetBranching::new();
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (pv, tv) = branching
                .choose_next_assignment(&store.accessor(), &problem, &mut rng)
                .unwrap();
            assert_eq!(pv, 1);
            assert!(tv == 2 || tv == 3, "t{tv} does not touch the lightest edge");
        }
    }

    #[test]
    fn test_all_singletons_means_none() {
        let problem = problem(&[(0, 1, 1)], &K4);
        let mut store = SearchTreeStore::new(vec![bits(4, &[0]), bits(4, &[3])], 4);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            CompleteTargetBranching::new().choose_next_assignment(&store.accessor(), &problem, &mut rng),
            None
        );
    }

    #[test]
    fn test_overflowing_cost_ranks_last() {
        let heavy: WeightWsm = 1 << 63;
        let problem = problem(&[(0, 1, heavy)], &[(0, 1, 2), (0, 2, 1), (1, 2, 1)]);
        let mut store = SearchTreeStore::new(vec![bits(3, &[0]), bits(3, &[1, 2])], 3);
        let accessor = store.accessor();
        assert_eq!(added_weight(1, 1, &accessor, &problem), WeightWsm::MAX);
        assert_eq!(added_weight(1, 2, &accessor, &problem), heavy);

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(
            CompleteTargetBranching::new().choose_next_assignment(&accessor, &problem, &mut rng),
            Some((1, 2))
        );
    }
}
