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

//! Most-constrained-first variable ordering.

use crate::{branching::TieBreaker, tree::accessor::DomainsAccessor};
use rand::Rng;
use wsm_graph::types::VertexWsm;

#[derive(Debug, Clone, Default)]
pub struct VariableOrdering;

impl VariableOrdering {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Returns an unassigned pattern vertex of minimum domain size, or
    /// `None` if every domain is a singleton.
    pub fn choose_next_variable<R>(
        &self,
        accessor: &DomainsAccessor<'_>,
        rng: &mut R,
    ) -> Option<VertexWsm>
    where
        R: Rng + ?Sized,
    {
        let mut best_size = usize::MAX;
        let mut breaker = TieBreaker::new();
        for &pv in accessor.get_unassigned_pattern_vertices_superset() {
            let size = accessor.get_domain_size(pv);
            if size < 2 || size > best_size {
                continue;
            }
            if size < best_size {
                best_size = size;
                breaker.reset(pv);
            } else {
                breaker.offer(pv, rng);
            }
        }
        breaker.into_chosen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::bits, tree::store::SearchTreeStore};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_picks_smallest_non_singleton_domain() {
        let mut store = SearchTreeStore::new(
            vec![bits(5, &[0, 1, 2]), bits(5, &[3]), bits(5, &[1, 4]), bits(5, &[0, 1, 2, 3])],
            5,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let accessor = store.accessor();
        assert_eq!(VariableOrdering::new().choose_next_variable(&accessor, &mut rng), Some(2));
    }

    #[test]
    fn test_all_singletons_means_none() {
        let mut store = SearchTreeStore::new(vec![bits(3, &[0]), bits(3, &[2])], 3);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let accessor = store.accessor();
        assert_eq!(VariableOrdering::new().choose_next_variable(&accessor, &mut rng), None);
    }

    #[test]
    fn test_ties_are_broken_by_the_generator() {
        let mut store = SearchTreeStore::new(vec![bits(4, &[0, 1]); 4], 4);
        let accessor = store.accessor();
        let ordering = VariableOrdering::new();
        let mut seen = [false; 4];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            if let Some(pv) = ordering.choose_next_variable(&accessor, &mut rng) {
                seen[pv] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));

        let first = ordering.choose_next_variable(&accessor, &mut ChaCha8Rng::seed_from_u64(9));
        let second = ordering.choose_next_variable(&accessor, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(first, second);
    }
}
