#[cfg(test)]
pub(crate) mod test_utils;

mod check_record;
mod query_pool;

pub use check_record::{
    check_a_record, check_aaaa_record, check_ip_addr, check_record, RecordType, AAAA_RECORD_LEN, A_RECORD_LEN,
};
pub use query_pool::{
    eviction_batch_size, PoolError, PoolStats, QueryId, QueryRecord, QueryRecordPool, SharedQueryRecordPool,
    DEFAULT_CAPACITY, MAX_CAPACITY,
};
