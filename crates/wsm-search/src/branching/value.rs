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

//! Highest-degree-first value ordering.

use crate::branching::TieBreaker;
use fixedbitset::FixedBitSet;
use rand::Rng;
use wsm_graph::{neighbours::NeighboursData, types::VertexWsm};

#[derive(Debug, Clone, Default)]
pub struct ValueOrdering;

impl ValueOrdering {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Returns a value of `domain` with the largest target degree, or `None`
    /// for an empty domain.
    pub fn get_target_value<R>(
        &self,
        domain: &FixedBitSet,
        target: &NeighboursData,
        rng: &mut R,
    ) -> Option<VertexWsm>
    where
        R: Rng + ?Sized,
    {
        let mut best_degree: Option<usize> = None;
        let mut breaker = TieBreaker::new();
        for tv in domain.ones() {
            let degree = target.degree(tv);
            match best_degree {
                Some(best) if degree < best => {}
                Some(best) if degree == best => breaker.offer(tv, rng),
                _ => {
                    best_degree = Some(degree);
                    breaker.reset(tv);
                }
            }
        }
        breaker.into_chosen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{bits, neighbours_data};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_prefers_high_degree() {
        // Degrees: t0 3, t1 1, t2 2, t3 2.
        let target = neighbours_data(&[(0, 1, 1), (0, 2, 1), (0, 3, 1), (2, 3, 1)]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let ordering = ValueOrdering::new();
        assert_eq!(ordering.get_target_value(&bits(4, &[0, 1, 2]), &target, &mut rng), Some(0));
        assert_eq!(ordering.get_target_value(&bits(4, &[1]), &target, &mut rng), Some(1));
        assert_eq!(ordering.get_target_value(&bits(4, &[]), &target, &mut rng), None);

        let mut seen = [false; 4];
        for _ in 0..100 {
            if let Some(tv) = ordering.get_target_value(&bits(4, &[1, 2, 3]), &target, &mut rng) {
                seen[tv] = true;
            }
        }
        assert_eq!(seen, [false, false, true, true]);
    }
}
