//! Pool-wide counters shared by the controller and every worker thread.
//!
//! Workers come and go, so counters live on the pool rather than on the
//! individual worker: a job processed by a worker that was later removed is
//! still accounted for.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters updated by the pool, its controller and its workers
#[derive(Debug, Default)]
pub(crate) struct PoolStats {
    jobs_submitted: AtomicU64,
    jobs_processed: AtomicU64,
    jobs_failed: AtomicU64,
    jobs_panicked: AtomicU64,
    total_processing_time_us: AtomicU64,
    workers_spawned: AtomicU64,
    workers_exited: AtomicU64,
}

impl PoolStats {
    /// Create zeroed statistics
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_submitted(&self) {
        self.jobs_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_processed(&self, elapsed_us: u64) {
        self.jobs_processed.fetch_add(1, Ordering::Relaxed);
        self.add_processing_time(elapsed_us);
    }

    pub(crate) fn record_failed(&self, elapsed_us: u64) {
        self.jobs_failed.fetch_add(1, Ordering::Relaxed);
        self.add_processing_time(elapsed_us);
    }

    pub(crate) fn record_panicked(&self, elapsed_us: u64) {
        self.jobs_panicked.fetch_add(1, Ordering::Relaxed);
        self.add_processing_time(elapsed_us);
    }

    pub(crate) fn record_worker_spawned(&self) {
        self.workers_spawned.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn record_worker_exited(&self) {
        self.workers_exited.fetch_add(1, Ordering::AcqRel);
    }

    fn add_processing_time(&self, microseconds: u64) {
        self.total_processing_time_us
            .fetch_add(microseconds, Ordering::Relaxed);
    }

    /// Number of worker threads that have started and not yet exited.
    ///
    /// Unlike the registry size this also counts removed workers whose
    /// thread is still finishing its current job.
    pub(crate) fn live_workers(&self) -> u64 {
        let exited = self.workers_exited.load(Ordering::Acquire);
        let spawned = self.workers_spawned.load(Ordering::Acquire);
        spawned.saturating_sub(exited)
    }

    /// Take a point-in-time copy of every counter
    pub(crate) fn snapshot(&self) -> PoolStatsSnapshot {
        let jobs_processed = self.jobs_processed.load(Ordering::Relaxed);
        let jobs_failed = self.jobs_failed.load(Ordering::Relaxed);
        let jobs_panicked = self.jobs_panicked.load(Ordering::Relaxed);
        let total_us = self.total_processing_time_us.load(Ordering::Relaxed);
        let finished = jobs_processed + jobs_failed + jobs_panicked;

        PoolStatsSnapshot {
            jobs_submitted: self.jobs_submitted.load(Ordering::Relaxed),
            jobs_processed,
            jobs_failed,
            jobs_panicked,
            average_processing_time_us: if finished > 0 {
                total_us as f64 / finished as f64
            } else {
                0.0
            },
            workers_spawned: self.workers_spawned.load(Ordering::Acquire),
            workers_exited: self.workers_exited.load(Ordering::Acquire),
        }
    }
}

/// Point-in-time copy of the pool's job and worker counters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoolStatsSnapshot {
    /// Jobs accepted by a worker through `submit`
    pub jobs_submitted: u64,
    /// Jobs that returned `Ok`
    pub jobs_processed: u64,
    /// Jobs that returned `Err`
    pub jobs_failed: u64,
    /// Jobs that panicked
    pub jobs_panicked: u64,
    /// Mean execution time over every finished job
    pub average_processing_time_us: f64,
    /// Worker threads started over the pool's lifetime
    pub workers_spawned: u64,
    /// Worker threads that have returned
    pub workers_exited: u64,
}
