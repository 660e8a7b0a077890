use rand::seq::SliceRandom as _;
use rand::Rng;

use super::QueryId;

/// Unallocated slot indices in arbitrary order.
///
/// Removal picks a uniformly random member and fills the hole with the last
/// element, so both operations are O(1).
pub(super) struct FreeSet {
    ids: Vec<QueryId>,
}

impl FreeSet {
    /// Creates a set holding every id in `0..capacity`, shuffled with `rng`.
    pub(super) fn new_full<R: Rng>(capacity: usize, rng: &mut R) -> Self {
        let mut free_set = FreeSet {
            ids: Vec::with_capacity(capacity),
        };
        free_set.refill(capacity, rng);
        free_set
    }

    pub(super) fn refill<R: Rng>(&mut self, capacity: usize, rng: &mut R) {
        self.ids.clear();
        // `capacity` never exceeds the id universe, so the cast can't truncate
        self.ids.extend((0..capacity).map(|idx| idx as QueryId));
        self.ids.shuffle(rng);
    }

    pub(super) fn take_random<R: Rng>(&mut self, rng: &mut R) -> Option<QueryId> {
        if self.ids.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.ids.len());
        Some(self.ids.swap_remove(idx))
    }

    pub(super) fn insert(&mut self, id: QueryId) {
        self.ids.push(id);
    }

    pub(super) fn len(&self) -> usize {
        self.ids.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[cfg(test)]
    pub(super) fn iter(&self) -> impl Iterator<Item = QueryId> + '_ {
        self.ids.iter().copied()
    }
}
