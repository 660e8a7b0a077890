use std::collections::VecDeque;
use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context as _;
use dnswall_lib::{PoolStats, QueryId, QueryRecordPool, SharedQueryRecordPool};
use tokio::task::JoinSet;
use tracing::Instrument;

/// Documentation address (RFC 5737) standing in for clients
const CLIENT_ADDR: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 1);

#[derive(Debug, Clone, Copy)]
pub struct ExerciseConfig {
    pub capacity: usize,
    pub queries: u32,
    pub workers: u8,
    pub answered_percent: u8,
    pub in_flight: usize,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExerciseReport {
    /// Answers matched to the query they were meant for
    pub answered: u64,
    /// Answers that arrived after their query was evicted
    pub stale: u64,
    /// Queries that never got an answer
    pub unanswered: u64,
    pub pool: PoolStats,
}

#[derive(Debug, Default)]
struct WorkerReport {
    answered: u64,
    stale: u64,
    unanswered: u64,
}

/// Drives a shared pool the way a forwarding proxy would: every worker mints ids
/// for outgoing queries and matches "answers" back to them once more than
/// `in_flight` of its queries are pending.
pub async fn run_exercise(config: ExerciseConfig) -> anyhow::Result<ExerciseReport> {
    let pool = QueryRecordPool::new(config.capacity)
        .map(SharedQueryRecordPool::from)
        .context("failed to create a query record pool")?;

    let mut workers = JoinSet::new();
    for idx in 0..config.workers {
        let queries = worker_share(config.queries, config.workers, idx);
        workers.spawn(
            run_worker(pool.clone(), idx, queries, config).instrument(tracing::trace_span!("", worker = idx)),
        );
    }

    let mut report = ExerciseReport::default();
    while let Some(result) = workers.join_next().await {
        let worker_report = result.context("worker task failed to execute")?;
        report.answered += worker_report.answered;
        report.stale += worker_report.stale;
        report.unanswered += worker_report.unanswered;
    }
    report.pool = pool.stats().await;

    Ok(report)
}

fn worker_share(queries: u32, workers: u8, idx: u8) -> u32 {
    let workers = workers as u32;
    let idx = idx as u32;
    queries / workers + u32::from(idx < queries % workers)
}

async fn run_worker(pool: SharedQueryRecordPool, worker: u8, queries: u32, config: ExerciseConfig) -> WorkerReport {
    let mut report = WorkerReport::default();
    let source_addr = SocketAddr::new(CLIENT_ADDR.into(), 10_000 + worker as u16);
    let mut pending: VecDeque<(QueryId, u16)> = VecDeque::with_capacity(config.in_flight);

    for seq in 0..queries {
        // Truncation is fine, this only has to look like a client's transaction id
        let original_id = seq as u16;
        let id = pool.allocate(original_id, Some(source_addr)).await;
        pending.push_back((id, original_id));

        if pending.len() <= config.in_flight {
            continue;
        }
        let Some((id, original_id)) = pending.pop_front() else {
            continue;
        };

        if seq % 100 >= config.answered_percent as u32 {
            report.unanswered += 1;
            continue;
        }

        let mut guard = pool.lock().await;
        // The id may have been evicted and handed to someone else in the meantime
        let matches = guard
            .lookup(id)
            .is_some_and(|record| record.original_id == original_id && record.source_addr == Some(source_addr));
        if matches && guard.free(id).is_ok() {
            report.answered += 1;
        } else {
            tracing::trace!(id, original_id, "Answer for an evicted query");
            report.stale += 1;
        }
    }

    report.unanswered += pending.len() as u64;
    tracing::debug!(?report, "Worker finished");

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_are_split_between_workers() {
        let shares: Vec<u32> = (0..3).map(|idx| worker_share(10, 3, idx)).collect();
        assert_eq!(shares, vec![4, 3, 3]);
        assert_eq!(worker_share(2, 4, 3), 0);
    }

    #[tokio::test]
    async fn roomy_pool_answers_everything() {
        let report = run_exercise(ExerciseConfig {
            capacity: 1024,
            queries: 500,
            workers: 4,
            answered_percent: 100,
            in_flight: 8,
        })
        .await
        .expect("shouldn't have failed");

        assert_eq!(report.stale, 0);
        assert_eq!(report.pool.evictions, 0);
        assert_eq!(report.answered + report.unanswered, 500);
        // Only the queries still pending at the end stay allocated
        assert_eq!(report.unanswered, 4 * 8);
        assert_eq!(report.pool.allocated, 4 * 8);
    }

    #[tokio::test]
    async fn unanswered_queries_get_evicted() {
        let report = run_exercise(ExerciseConfig {
            capacity: 64,
            queries: 2000,
            workers: 2,
            answered_percent: 0,
            in_flight: 4,
        })
        .await
        .expect("shouldn't have failed");

        assert_eq!(report.answered, 0);
        assert_eq!(report.unanswered, 2000);
        assert!(report.pool.evictions > 0);
        assert_eq!(report.pool.allocated + report.pool.free, 64);
    }
}
