use std::net::SocketAddr;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::{Mutex, MutexGuard};

use super::{PoolError, PoolStats, QueryId, QueryRecord, QueryRecordPool};

/// A [`QueryRecordPool`] that can be shared between tasks.
///
/// Every operation holds a single lock over the whole pool. Operations are
/// short and never wait on I/O, so there's nothing to gain from finer locking.
pub struct SharedQueryRecordPool<R = StdRng> {
    inner: Arc<Mutex<QueryRecordPool<R>>>,
}

impl<R> Clone for SharedQueryRecordPool<R> {
    fn clone(&self) -> Self {
        SharedQueryRecordPool {
            inner: self.inner.clone(),
        }
    }
}

impl SharedQueryRecordPool<StdRng> {
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        QueryRecordPool::new(capacity).map(SharedQueryRecordPool::from)
    }
}

impl<R> From<QueryRecordPool<R>> for SharedQueryRecordPool<R> {
    fn from(pool: QueryRecordPool<R>) -> Self {
        SharedQueryRecordPool {
            inner: Arc::new(Mutex::new(pool)),
        }
    }
}

impl<R: Rng> SharedQueryRecordPool<R> {
    pub async fn allocate(&self, original_id: u16, source_addr: Option<SocketAddr>) -> QueryId {
        self.inner.lock().await.allocate_with(original_id, source_addr)
    }

    pub async fn lookup(&self, id: QueryId) -> Option<QueryRecord> {
        self.inner.lock().await.lookup(id).copied()
    }

    pub async fn free(&self, id: QueryId) -> Result<QueryRecord, PoolError> {
        self.inner.lock().await.free(id)
    }

    pub async fn stats(&self) -> PoolStats {
        self.inner.lock().await.stats()
    }

    /// Locks the pool for a sequence of operations that must not interleave
    /// with other tasks, e.g. a lookup followed by a free.
    pub async fn lock(&self) -> MutexGuard<'_, QueryRecordPool<R>> {
        self.inner.lock().await
    }
}
