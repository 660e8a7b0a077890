mod alloc_list;
mod free_set;
mod query_record;
mod shared;

use std::net::SocketAddr;

use alloc_list::AllocList;
use free_set::FreeSet;
pub use query_record::QueryRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng as _};
pub use shared::SharedQueryRecordPool;
use thiserror::Error;

/// Handle of an allocated [`QueryRecord`]. Fits into a DNS header's ID field.
pub type QueryId = u16;

/// Number of distinct DNS transaction ids
pub const MAX_CAPACITY: usize = 1 << 16;
pub const DEFAULT_CAPACITY: usize = MAX_CAPACITY;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum PoolError {
    #[error("invalid pool capacity {0}: expected a value between 1 and {MAX_CAPACITY}")]
    InvalidCapacity(usize),
    #[error("query record {0} is not allocated")]
    NotAllocated(QueryId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    pub capacity: usize,
    pub allocated: usize,
    pub free: usize,
    /// Records dropped to make room for new ones since the last reset
    pub evictions: u64,
}

/// How many of the oldest records get dropped once a pool of `capacity`
/// records is exhausted.
///
/// Dropping a whole batch instead of a single record leaves plenty of ids to
/// choose from for subsequent allocations, so the ids handed out after
/// exhaustion stay hard to guess.
pub fn eviction_batch_size(capacity: usize) -> usize {
    (capacity / 4).max(1)
}

/// Fixed-capacity pool of in-flight queries, each identified by a randomly
/// chosen [`QueryId`].
///
/// Ids are drawn uniformly from the currently free ones using `R`. When every
/// record is in use, the least recently allocated quarter of the pool is
/// evicted, so allocation never fails.
///
/// The default [`StdRng`] is a CSPRNG seeded from the OS; anything weaker
/// makes the ids predictable and should only be plugged in for tests.
pub struct QueryRecordPool<R = StdRng> {
    /// Indexed by id, `None` for free slots
    records: Vec<Option<QueryRecord>>,
    free_set: FreeSet,
    alloc_list: AllocList,
    rng: R,
    evictions: u64,
}

impl QueryRecordPool<StdRng> {
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        QueryRecordPool::with_rng(capacity, StdRng::from_entropy())
    }
}

impl<R: Rng> QueryRecordPool<R> {
    pub fn with_rng(capacity: usize, mut rng: R) -> Result<Self, PoolError> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(PoolError::InvalidCapacity(capacity));
        }

        Ok(QueryRecordPool {
            records: vec![None; capacity],
            free_set: FreeSet::new_full(capacity, &mut rng),
            alloc_list: AllocList::new(capacity),
            rng,
            evictions: 0,
        })
    }

    /// Frees every record, returning how many live records were discarded.
    ///
    /// Ids of discarded records may be handed out again right away, so any
    /// of them still held by the caller must be considered stale.
    pub fn reset(&mut self) -> usize {
        let discarded = self.len();
        if discarded > 0 {
            tracing::warn!(discarded, "Resetting a query record pool with live records");
        }

        self.records.fill(None);
        self.free_set.refill(self.records.len(), &mut self.rng);
        self.alloc_list.clear();
        self.evictions = 0;

        discarded
    }

    /// Allocates a record with a random id and zeroed fields.
    ///
    /// If the pool is exhausted, the oldest records are evicted first.
    pub fn allocate(&mut self) -> &mut QueryRecord {
        let id = loop {
            if let Some(id) = self.free_set.take_random(&mut self.rng) {
                break id;
            }
            // Can't loop forever: capacity is never zero, so there's always
            // something to evict when the free set is empty
            self.evict_oldest();
        };

        self.alloc_list.push_front(id);
        tracing::trace!(id, "Allocated a query record");

        self.records[id as usize].insert(QueryRecord::new(id))
    }

    /// Allocates a record and fills it in, returning its id.
    pub fn allocate_with(&mut self, original_id: u16, source_addr: Option<SocketAddr>) -> QueryId {
        let record = self.allocate();
        record.original_id = original_id;
        record.source_addr = source_addr;
        record.id()
    }

    /// Returns the record with the given `id`, if it's allocated.
    pub fn lookup(&self, id: QueryId) -> Option<&QueryRecord> {
        self.records.get(id as usize)?.as_ref()
    }

    pub fn lookup_mut(&mut self, id: QueryId) -> Option<&mut QueryRecord> {
        self.records.get_mut(id as usize)?.as_mut()
    }

    /// Returns the record with the given `id` to the pool and hands back what it
    /// contained.
    ///
    /// Freeing an id that isn't allocated is rejected without touching the pool.
    pub fn free(&mut self, id: QueryId) -> Result<QueryRecord, PoolError> {
        let record = self.release(id).ok_or(PoolError::NotAllocated(id))?;
        tracing::trace!(id, "Freed a query record");
        Ok(record)
    }

    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Number of allocated records
    pub fn len(&self) -> usize {
        self.alloc_list.len()
    }

    pub fn free_count(&self) -> usize {
        self.free_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.free_set.is_empty()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity(),
            allocated: self.len(),
            free: self.free_count(),
            evictions: self.evictions,
        }
    }

    fn release(&mut self, id: QueryId) -> Option<QueryRecord> {
        let record = self.records.get_mut(id as usize)?.take()?;
        self.alloc_list.remove(id);
        self.free_set.insert(id);
        Some(record)
    }

    fn evict_oldest(&mut self) {
        let batch_size = eviction_batch_size(self.capacity());
        let oldest: Vec<QueryId> = self.alloc_list.oldest(batch_size).collect();

        let evicted = oldest
            .into_iter()
            .filter_map(|id| self.release(id))
            .count();
        self.evictions += evicted as u64;

        tracing::debug!(
            evicted,
            free = self.free_count(),
            "Query record pool is exhausted, evicted the oldest records"
        );
    }

    #[cfg(test)]
    fn assert_invariants(&self) {
        use std::collections::HashSet;

        let free: HashSet<QueryId> = self.free_set.iter().collect();
        let allocated: HashSet<QueryId> = self.alloc_list.iter().collect();

        assert_eq!(free.len(), self.free_set.len(), "duplicate ids in the free set");
        assert_eq!(allocated.len(), self.alloc_list.len(), "duplicate ids in the alloc list");
        assert!(free.is_disjoint(&allocated), "id is both free and allocated");
        assert_eq!(free.len() + allocated.len(), self.capacity());

        for (idx, record) in self.records.iter().enumerate() {
            let id = idx as QueryId;
            match record {
                Some(record) => {
                    assert_eq!(record.id(), id);
                    assert!(allocated.contains(&id), "record {} isn't in the alloc list", id);
                }
                None => assert!(free.contains(&id), "slot {} isn't in the free set", id),
            }
        }
    }
}
