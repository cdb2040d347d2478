//! Tracing integration for observability.
//!
//! Enabled by the `tracing` feature. Workers run inside a `worker` span and
//! each job inside a `job_execution` span; the functions in [`metrics`] emit
//! structured events for pool activity that a subscriber can turn into
//! counters and gauges.
//!
//! # Example
//!
//! ```rust,ignore
//! use dynamic_worker_pool::prelude::*;
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env()
//!         .add_directive("dynamic_worker_pool=trace".parse().unwrap()))
//!     .init();
//!
//! let pool = WorkerPool::new()?;
//! pool.resize(4)?;
//! ```

/// Structured events describing pool activity.
pub mod metrics {
    use crate::pool::{PoolStatsSnapshot, WorkerId};
    use std::time::Duration;

    /// Records a job handed to a worker.
    #[inline]
    pub fn record_submission() {
        tracing::trace!(counter.jobs_submitted = 1, "job submitted");
    }

    /// Records job completion with timing.
    #[inline]
    pub fn record_completion(worker_id: WorkerId, duration: Duration, success: bool) {
        let duration_ms = duration.as_millis() as u64;
        if success {
            tracing::trace!(
                counter.jobs_completed = 1,
                histogram.job_duration_ms = duration_ms,
                worker_id = worker_id,
                "job completed successfully"
            );
        } else {
            tracing::trace!(
                counter.jobs_failed = 1,
                histogram.job_duration_ms = duration_ms,
                worker_id = worker_id,
                "job failed"
            );
        }
    }

    /// Records a job panic event.
    #[inline]
    pub fn record_panic(worker_id: WorkerId, duration: Duration) {
        tracing::trace!(
            counter.jobs_panicked = 1,
            histogram.job_duration_ms = duration.as_millis() as u64,
            worker_id = worker_id,
            "job panicked"
        );
    }

    /// Records a worker registered by the controller.
    #[inline]
    pub fn record_worker_added(worker_id: WorkerId, running: usize) {
        tracing::debug!(
            gauge.workers_running = running as i64,
            worker_id = worker_id,
            "worker added"
        );
    }

    /// Records a worker stopped and erased by the controller.
    #[inline]
    pub fn record_worker_removed(worker_id: WorkerId, running: usize) {
        tracing::debug!(
            gauge.workers_running = running as i64,
            worker_id = worker_id,
            "worker removed"
        );
    }

    /// Records the end of `close`.
    #[inline]
    pub fn record_pool_close(pool_name: &str, stats: &PoolStatsSnapshot) {
        tracing::info!(
            pool = pool_name,
            jobs_processed = stats.jobs_processed,
            jobs_failed = stats.jobs_failed,
            jobs_panicked = stats.jobs_panicked,
            workers_spawned = stats.workers_spawned,
            "worker pool closed"
        );
    }
}
