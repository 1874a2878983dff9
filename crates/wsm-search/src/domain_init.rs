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

//! Initial domains from degree sequences and distance counts.
//!
//! Both filters are necessary conditions for `pv -> tv` to extend to a full
//! monomorphism:
//!
//! 1. The neighbours of `pv` map injectively onto neighbours of `tv`, and a
//!    neighbour of degree `k` needs an image of degree at least `k`. With
//!    both neighbour-degree sequences sorted largest first, the `i`-th pattern
//!    degree must not exceed the `i`-th target degree.
//! 2. Distances never grow under a monomorphism, so the vertices within
//!    distance `d` of `pv` map injectively into those within distance `d`
//!    of `tv`.

use fixedbitset::FixedBitSet;
use tracing::debug;
use wsm_graph::{near_neighbours::NearNeighboursData, neighbours::NeighboursData};

/// Fills the root domains. Keeps its work buffers between calls.
#[derive(Debug, Clone, Default)]
pub struct DomainInitialiser {
    target_degree_sequences: Vec<Vec<usize>>,
    tv_to_erase: Vec<usize>,
}

impl DomainInitialiser {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces `domains` by one domain per pattern vertex and filters them.
    ///
    /// Returns `false` as soon as some domain becomes empty, in which case no
    /// monomorphism exists. Distances `2..=max_path_length` are checked;
    /// distance 1 is covered by the degree filter.
    pub fn full_initialisation(
        &mut self,
        domains: &mut Vec<FixedBitSet>,
        pattern: &NeighboursData,
        pattern_near: &mut NearNeighboursData,
        target: &NeighboursData,
        target_near: &mut NearNeighboursData,
        max_path_length: usize,
    ) -> bool {
        self.degree_sequence_initialisation(domains, pattern, target)
            && self.distance_counts_reduction(domains, pattern_near, target_near, max_path_length)
    }

    fn degree_sequence_initialisation(
        &mut self,
        domains: &mut Vec<FixedBitSet>,
        pattern: &NeighboursData,
        target: &NeighboursData,
    ) -> bool {
        let number_of_target_vertices = target.number_of_vertices();
        self.target_degree_sequences.clear();
        self.target_degree_sequences
            .extend((0..number_of_target_vertices).map(|tv| target.sorted_degree_sequence(tv)));

        domains.clear();
        for pv in 0..pattern.number_of_vertices() {
            let pattern_sequence = pattern.sorted_degree_sequence(pv);
            let mut domain = FixedBitSet::with_capacity(number_of_target_vertices);
            for (tv, target_sequence) in self.target_degree_sequences.iter().enumerate() {
                if dominates(target_sequence, &pattern_sequence) {
                    domain.insert(tv);
                }
            }
            if domain.is_clear() {
                debug!(pv, "degree sequence filter left an empty domain");
                return false;
            }
            domains.push(domain);
        }
        true
    }

    fn distance_counts_reduction(
        &mut self,
        domains: &mut [FixedBitSet],
        pattern_near: &mut NearNeighboursData,
        target_near: &mut NearNeighboursData,
        max_path_length: usize,
    ) -> bool {
        for (pv, domain) in domains.iter_mut().enumerate() {
            let mut previous_count = pattern_near.get_n_vertices_up_to_distance(pv, 1);
            for distance in 2..=max_path_length {
                let pattern_count = pattern_near.get_n_vertices_up_to_distance(pv, distance);
                if pattern_count == previous_count {
                    // The component of pv is exhausted.
                    break;
                }
                previous_count = pattern_count;

                self.tv_to_erase.clear();
                for tv in domain.ones() {
                    if target_near.get_n_vertices_up_to_distance(tv, distance) < pattern_count {
                        self.tv_to_erase.push(tv);
                    }
                }
                for &tv in &self.tv_to_erase {
                    domain.set(tv, false);
                }
                if domain.is_clear() {
                    debug!(pv, distance, "distance count filter left an empty domain");
                    return false;
                }
            }
        }
        true
    }
}

/// Returns `true` if `target` is at least as long as `pattern` and
/// pointwise at least as large; both are sorted largest first.
#[inline]
fn dominates(target: &[usize], pattern: &[usize]) -> bool {
    target.len() >= pattern.len() && pattern.iter().zip(target).all(|(p, t)| p <= t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{neighbours_data, ones};

    fn initialise(
        pattern: &NeighboursData,
        target: &NeighboursData,
        max_path_length: usize,
    ) -> Option<Vec<FixedBitSet>> {
        let mut domains = Vec::new();
        let mut pattern_near = NearNeighboursData::new(pattern);
        let mut target_near = NearNeighboursData::new(target);
        DomainInitialiser::new()
            .full_initialisation(
                &mut domains,
                pattern,
                &mut pattern_near,
                target,
                &mut target_near,
                max_path_length,
            )
            .then_some(domains)
    }

    #[test]
    fn test_dominates() {
        assert!(dominates(&[3, 2, 2], &[3, 1]));
        assert!(!dominates(&[3], &[1, 1]));
        assert!(!dominates(&[2, 2], &[3, 1]));
        assert!(dominates(&[1], &[]));
    }

    #[test]
    fn test_degree_filter_on_star() {
        // Pattern: star with centre 0 and three leaves.
        // Target: star with centre 0 and four leaves, plus a pendant path 4-5.
        let pattern = neighbours_data(&[(0, 1, 1), (0, 2, 1), (0, 3, 1)]);
        let target = neighbours_data(&[(0, 1, 1), (0, 2, 1), (0, 3, 1), (0, 4, 1), (4, 5, 1)]);
        let domains = initialise(&pattern, &target, 1).unwrap();
        assert_eq!(ones(&domains[0]), vec![0]);
        // A leaf (neighbour degree 3) needs a neighbour of degree >= 3.
        assert_eq!(ones(&domains[1]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_distance_filter_removes_short_reach() {
        // Pattern: path 0-1-2-3. Target: path 0-1-2 and path 3-4-5-6.
        // The pattern end reaches 3 vertices within distance 3; the ends of
        // the short target path only reach 2.
        let pattern = neighbours_data(&[(0, 1, 1), (1, 2, 1), (2, 3, 1)]);
        let target = neighbours_data(&[(0, 1, 1), (1, 2, 1), (3, 4, 1), (4, 5, 1), (5, 6, 1)]);

        let degree_only = initialise(&pattern, &target, 1).unwrap();
        assert_eq!(ones(&degree_only[0]), vec![0, 2, 3, 4, 5, 6]);

        let domains = initialise(&pattern, &target, 3).unwrap();
        assert_eq!(ones(&domains[0]), vec![3, 4, 5, 6]);
        assert_eq!(ones(&domains[1]), vec![4, 5]);
    }

    #[test]
    fn test_distance_filter_detects_infeasibility() {
        // Pattern: path on 4 vertices. Target: two disjoint edges and a
        // triangle, no component has 4 vertices.
        let pattern = neighbours_data(&[(0, 1, 1), (1, 2, 1), (2, 3, 1)]);
        let target = neighbours_data(&[(0, 1, 1), (2, 3, 1), (4, 5, 1), (5, 6, 1), (4, 6, 1)]);
        assert!(initialise(&pattern, &target, 1).is_some());
        assert!(initialise(&pattern, &target, 3).is_none());
    }

    #[test]
    fn test_degree_filter_detects_infeasibility() {
        let pattern = neighbours_data(&[(0, 1, 1), (0, 2, 1), (0, 3, 1)]);
        let target = neighbours_data(&[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 0, 1)]);
        assert!(initialise(&pattern, &target, 4).is_none());
    }
}
