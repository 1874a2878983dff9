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

//! Branching heuristics.
//!
//! The search branches on a pattern vertex with the smallest domain larger
//! than one, and tries first the target vertex of highest degree. A complete
//! target switches to the weight-driven ordering of [`complete_target`].
//! Ties are broken uniformly at random by the caller's generator, so a
//! seeded generator makes the whole search reproducible.

pub mod complete_target;
pub mod value;
pub mod variable;

use rand::Rng;

/// Keeps one of a stream of equally good candidates, each with equal
/// probability (reservoir sampling of size one).
#[derive(Debug, Clone, Copy)]
pub(crate) struct TieBreaker<T> {
    chosen: Option<T>,
    ties: u32,
}

impl<T> TieBreaker<T> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            chosen: None,
            ties: 0,
        }
    }

    /// Starts over with `candidate` as the only one seen.
    #[inline]
    pub(crate) fn reset(&mut self, candidate: T) {
        self.chosen = Some(candidate);
        self.ties = 1;
    }

    /// Offers another candidate as good as the current one.
    #[inline]
    pub(crate) fn offer<R>(&mut self, candidate: T, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.ties = self.ties.saturating_add(1);
        if rng.random_range(0..self.ties) == 0 {
            self.chosen = Some(candidate);
        }
    }

    #[inline]
    pub(crate) fn into_chosen(self) -> Option<T> {
        self.chosen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_tie_breaker_is_roughly_uniform() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut counts = [0u32; 4];
        for _ in 0..4000 {
            let mut breaker = TieBreaker::new();
            breaker.reset(0usize);
            for candidate in 1..4 {
                breaker.offer(candidate, &mut rng);
            }
            counts[breaker.into_chosen().unwrap()] += 1;
        }
        assert!(counts.iter().all(|&c| (800..1200).contains(&c)), "{counts:?}");
    }

    #[test]
    fn test_empty_tie_breaker_chooses_nothing() {
        assert_eq!(TieBreaker::<usize>::new().into_chosen(), None);
    }
}
