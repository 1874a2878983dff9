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

//! Hall-set reduction.
//!
//! If `k` pattern vertices have domains whose union has exactly `k` values,
//! those values are used up by those vertices and can be removed from every
//! other domain. A union smaller than `k` is a nogood.
//!
//! Vertices with domain size at least 2 are first split into partitions:
//! two vertices are in the same partition when a chain of shared values
//! connects their domains. Hall sets are searched per partition, smallest
//! domains first, by growing a union one vertex at a time.
//!
//! Partitions are rebuilt on every call from the current domains rather than
//! maintained across nodes. The union-find pass visits each domain value
//! once, so a rebuild is near-linear in the total domain size. Its buffers
//! come from a pool kept between calls and stop allocating once warm. For a
//! partition of `k` vertices the search then does at most `k` bitset unions
//! and `O(k^2)` size comparisons.

use crate::{reducers::ReductionResult, tree::accessor::DomainsAccessor};
use fixedbitset::FixedBitSet;
use std::cmp::Reverse;
use wsm_core::utils::reusable_storage::{ReusableStorage, StorageHandle};
use wsm_graph::types::VertexWsm;

/// The result of searching one sorted partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Detection {
    /// No proper Hall set along the smallest-first order.
    None,
    /// The union of the last `k` members is smaller than `k`.
    Nogood,
    /// The last `k` members form a Hall set; the union is left in place.
    HallSet(usize),
}

#[derive(Debug, Default)]
pub struct HallSetReducer {
    partitions: ReusableStorage<Vec<VertexWsm>>,
    pending: Vec<StorageHandle>,
    candidates: Vec<VertexWsm>,
    parent: Vec<usize>,
    root_slot: Vec<Option<usize>>,
    first_owner: Vec<Option<usize>>,
    union: FixedBitSet,
    moved: Vec<VertexWsm>,
    hall_sets_found: u64,
}

impl HallSetReducer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many Hall sets have been used for reduction so far.
    #[inline]
    pub fn hall_sets_found(&self) -> u64 {
        self.hall_sets_found
    }

    /// Returns how many partitions are currently held. Zero between calls.
    #[inline]
    pub fn live_partitions(&self) -> usize {
        self.partitions.num_live()
    }

    pub fn reduce(&mut self, accessor: &mut DomainsAccessor<'_>) -> ReductionResult {
        self.build_partitions(accessor);

        let mut result = ReductionResult::Success;
        while let Some(handle) = self.pending.pop() {
            if result != ReductionResult::Success {
                self.partitions.release(handle);
                continue;
            }
            result = self.process_partition(handle, accessor);
        }
        result
    }

    /// Groups the unassigned vertices into value-connected partitions.
    fn build_partitions(&mut self, accessor: &DomainsAccessor<'_>) {
        self.candidates.clear();
        self.candidates.extend(
            accessor
                .get_unassigned_pattern_vertices_superset()
                .iter()
                .copied()
                .filter(|&pv| accessor.get_domain_size(pv) >= 2),
        );

        let n_candidates = self.candidates.len();
        self.parent.clear();
        self.parent.extend(0..n_candidates);
        self.first_owner.clear();
        self.first_owner
            .resize(accessor.number_of_target_vertices(), None);

        for (index, &pv) in self.candidates.iter().enumerate() {
            for tv in accessor.get_domain(pv).ones() {
                match self.first_owner[tv] {
                    Some(owner) => union_roots(&mut self.parent, owner, index),
                    None => self.first_owner[tv] = Some(index),
                }
            }
        }

        self.root_slot.clear();
        self.root_slot.resize(n_candidates, None);
        for index in 0..n_candidates {
            let root = find_root(&mut self.parent, index);
            let slot = match self.root_slot[root] {
                Some(slot) => slot,
                None => {
                    self.pending.push(self.partitions.acquire());
                    let slot = self.pending.len() - 1;
                    self.root_slot[root] = Some(slot);
                    slot
                }
            };
            self.partitions
                .get_mut(&self.pending[slot])
                .push(self.candidates[index]);
        }
    }

    /// Searches one partition for a Hall set and applies it. The handle is
    /// either released or requeued (together with the split-off part).
    fn process_partition(
        &mut self,
        handle: StorageHandle,
        accessor: &mut DomainsAccessor<'_>,
    ) -> ReductionResult {
        let members = self.partitions.get_mut(&handle);
        members.retain(|&pv| accessor.get_domain_size(pv) >= 2);
        if members.len() < 3 {
            self.partitions.release(handle);
            return ReductionResult::Success;
        }
        members.sort_unstable_by_key(|&pv| (Reverse(accessor.get_domain_size(pv)), pv));

        let hall_set_size = match detect(members, &mut self.union, accessor) {
            Detection::None => {
                self.partitions.release(handle);
                return ReductionResult::Success;
            }
            Detection::Nogood => {
                self.partitions.release(handle);
                accessor.mark_nogood();
                return ReductionResult::Nogood;
            }
            Detection::HallSet(k) => k,
        };
        self.hall_sets_found += 1;

        let split_at = members.len() - hall_set_size;
        self.moved.clear();
        self.moved.extend_from_slice(&members[split_at..]);
        members.truncate(split_at);

        let mut result = ReductionResult::Success;
        for &pv in members.iter() {
            result = result.combine(
                accessor
                    .intersect_domain_with_complement(pv, &self.union)
                    .reduction_result,
            );
            if result == ReductionResult::Nogood {
                break;
            }
        }

        if result != ReductionResult::Success {
            self.partitions.release(handle);
            return result;
        }

        let split_off = self.partitions.acquire();
        self.partitions.get_mut(&split_off).extend_from_slice(&self.moved);
        self.pending.push(split_off);
        self.pending.push(handle);
        ReductionResult::Success
    }
}

/// Grows the union of the smallest domains of `members` (sorted largest
/// first) until it is no larger than the number of vertices used, or until
/// that provably cannot happen.
fn detect(
    members: &[VertexWsm],
    union: &mut FixedBitSet,
    accessor: &DomainsAccessor<'_>,
) -> Detection {
    let len = members.len();
    union.clear();
    union.grow(accessor.number_of_target_vertices());
    let mut union_size = 0;
    let mut used = 0;

    loop {
        if used > 0 && union_size <= used {
            break;
        }
        if used >= len {
            return Detection::None;
        }
        // Using m vertices gives a union of at least max(union, size of the
        // m-th smallest domain), which must not exceed m.
        let may_shrink = (used + 1..=len)
            .any(|m| union_size.max(accessor.get_domain_size(members[len - m])) <= m);
        if !may_shrink {
            return Detection::None;
        }

        union.union_with(accessor.get_domain(members[len - 1 - used]));
        union_size = union.count_ones(..);
        used += 1;
    }

    if union_size < used {
        Detection::Nogood
    } else if used < len {
        Detection::HallSet(used)
    } else {
        Detection::None
    }
}

fn find_root(parent: &mut [usize], mut index: usize) -> usize {
    while parent[index] != index {
        parent[index] = parent[parent[index]];
        index = parent[index];
    }
    index
}

fn union_roots(parent: &mut [usize], a: usize, b: usize) {
    let root_a = find_root(parent, a);
    let root_b = find_root(parent, b);
    if root_a != root_b {
        parent[root_a.max(root_b)] = root_a.min(root_b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{bits, ones},
        tree::store::SearchTreeStore,
    };

    fn run(domains: &[&[usize]], n_target: usize) -> (SearchTreeStore, ReductionResult, u64) {
        let mut store = SearchTreeStore::new(
            domains.iter().map(|values| bits(n_target, values)).collect(),
            n_target,
        );
        let mut reducer = HallSetReducer::new();
        let result = reducer.reduce(&mut store.accessor());
        assert_eq!(reducer.live_partitions(), 0);
        (store, result, reducer.hall_sets_found())
    }

    #[test]
    fn test_hall_pair_removes_values_from_others() {
        let (store, result, found) = run(&[&[0, 1], &[0, 1], &[0, 1, 2, 3], &[1, 2, 3]], 5);
        assert_eq!(result, ReductionResult::Success);
        assert_eq!(found, 1);
        assert_eq!(ones(store.domain_at_level(2, 0)), vec![2, 3]);
        assert_eq!(ones(store.domain_at_level(3, 0)), vec![2, 3]);
        assert_eq!(ones(store.domain_at_level(0, 0)), vec![0, 1]);
    }

    #[test]
    fn test_repeated_rebuilds_reuse_pooled_partitions() {
        let mut store = SearchTreeStore::new(
            vec![bits(5, &[0, 1]), bits(5, &[0, 1]), bits(5, &[0, 1, 2, 3]), bits(5, &[1, 2, 3])],
            5,
        );
        let mut reducer = HallSetReducer::new();
        assert_eq!(reducer.reduce(&mut store.accessor()), ReductionResult::Success);
        let slots = reducer.partitions.num_slots();
        assert_eq!(slots, 2);

        for _ in 0..3 {
            assert_eq!(reducer.reduce(&mut store.accessor()), ReductionResult::Success);
            assert_eq!(reducer.partitions.num_slots(), slots);
            assert_eq!(reducer.live_partitions(), 0);
        }
        assert_eq!(reducer.hall_sets_found(), 1);
    }

    #[test]
    fn test_hall_set_forcing_a_value() {
        let (mut store, result, _) = run(&[&[0, 1], &[0, 1], &[0, 1, 2]], 4);
        assert_eq!(result, ReductionResult::NewAssignments);
        assert_eq!(store.accessor().get_singleton_value(2), Some(2));
    }

    #[test]
    fn test_too_few_values_is_nogood() {
        let (mut store, result, _) = run(&[&[0, 1], &[0, 1], &[0, 1]], 4);
        assert_eq!(result, ReductionResult::Nogood);
        assert!(store.accessor().is_nogood());
    }

    #[test]
    fn test_no_hall_set_changes_nothing() {
        let (store, result, found) = run(&[&[0, 1, 2], &[1, 2, 3], &[2, 3, 4]], 5);
        assert_eq!(result, ReductionResult::Success);
        assert_eq!(found, 0);
        assert_eq!(ones(store.domain_at_level(0, 0)), vec![0, 1, 2]);
    }

    #[test]
    fn test_disjoint_partitions_are_independent() {
        // {0, 1} x3 is infeasible on its own, {2..5} x3 is fine.
        let (_, result, _) = run(
            &[&[2, 3, 4], &[3, 4, 5], &[0, 1], &[0, 1], &[0, 1], &[2, 5]],
            6,
        );
        assert_eq!(result, ReductionResult::Nogood);
    }

    #[test]
    fn test_detect_on_sorted_partition() {
        let mut store = SearchTreeStore::new(
            vec![bits(4, &[0, 1, 2, 3]), bits(4, &[1, 2]), bits(4, &[1, 2])],
            4,
        );
        let accessor = store.accessor();
        let mut union = FixedBitSet::new();
        assert_eq!(detect(&[0, 1, 2], &mut union, &accessor), Detection::HallSet(2));
        assert_eq!(ones(&union), vec![1, 2]);
    }

    #[test]
    fn test_union_find() {
        let mut parent: Vec<usize> = (0..5).collect();
        union_roots(&mut parent, 3, 4);
        union_roots(&mut parent, 1, 4);
        assert_eq!(find_root(&mut parent, 3), 1);
        assert_eq!(find_root(&mut parent, 0), 0);
    }
}
