//! Worker thread implementation

use crate::core::{BoxedJob, PoolError, Result};
use crate::pool::stats::PoolStats;
use crossbeam::channel::{self, select, Receiver, Sender};
use crossbeam::sync::WaitGroup;
use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

#[cfg(feature = "tracing")]
use tracing::{span, Level};

/// Identity of a worker. Assigned by the controller, never reused.
pub type WorkerId = u64;

/// Process-unique identity of a pool, used to recognise its worker threads.
pub(crate) type PoolId = u64;

thread_local! {
    static OWNING_POOL: Cell<Option<PoolId>> = Cell::new(None);
}

/// True when the calling thread is one of `pool`'s workers.
pub(crate) fn on_worker_of(pool: PoolId) -> bool {
    OWNING_POOL.with(|owner| owner.get() == Some(pool))
}

/// Registry entry for a running worker thread.
///
/// The handle owns the sending half of the worker's private quit channel.
/// [`stop`](Worker::stop) consumes the handle, so a worker can be signalled
/// at most once.
#[derive(Debug)]
pub(crate) struct Worker {
    id: WorkerId,
    quit: Sender<()>,
}

/// Keeps the pool's wait group and live-worker gauge in step with the thread.
struct Liveness {
    stats: Arc<PoolStats>,
    _wait_group: WaitGroup,
}

impl Liveness {
    fn enter(stats: Arc<PoolStats>, wait_group: WaitGroup) -> Self {
        stats.record_worker_spawned();
        Self {
            stats,
            _wait_group: wait_group,
        }
    }
}

impl Drop for Liveness {
    fn drop(&mut self) {
        self.stats.record_worker_exited();
    }
}

impl Worker {
    /// Spawn a worker thread pulling jobs from `intake`.
    ///
    /// The thread holds a clone of `wait_group` until it returns, which is
    /// what lets `close` block until every worker, including previously
    /// removed ones still finishing a job, has exited.
    pub(crate) fn start(
        pool: PoolId,
        id: WorkerId,
        intake: Receiver<BoxedJob>,
        stats: Arc<PoolStats>,
        wait_group: WaitGroup,
        thread_name: String,
    ) -> Result<Self> {
        let (quit, quit_rx) = channel::bounded::<()>(0);

        thread::Builder::new()
            .name(thread_name)
            .spawn(move || {
                let _liveness = Liveness::enter(Arc::clone(&stats), wait_group);
                OWNING_POOL.with(|owner| owner.set(Some(pool)));
                Self::run(id, &intake, &quit_rx, &stats);
            })
            .map_err(|e| PoolError::spawn_with_source(id, e))?;

        Ok(Self { id, quit })
    }

    /// Signal the worker to exit after its current job, without waiting.
    pub(crate) fn stop(self) {
        let Worker { id, quit } = self;
        drop(quit);
        log::trace!("worker {} signalled to stop", id);
    }

    /// Main worker loop.
    ///
    /// Returns when the quit channel disconnects or the intake is closed.
    /// A job already received is always run to completion first.
    fn run(id: WorkerId, intake: &Receiver<BoxedJob>, quit: &Receiver<()>, stats: &PoolStats) {
        #[cfg(feature = "tracing")]
        let worker_span = span!(Level::DEBUG, "worker", id = id);
        #[cfg(feature = "tracing")]
        let _guard = worker_span.enter();

        log::debug!("worker {} started", id);

        loop {
            select! {
                recv(quit) -> _ => {
                    log::debug!("worker {} stopped", id);
                    break;
                }
                recv(intake) -> msg => match msg {
                    Ok(mut job) => Self::execute_job(id, &mut job, stats),
                    Err(_) => {
                        log::debug!("worker {} exiting: intake closed", id);
                        break;
                    }
                },
            }
        }
    }

    /// Execute a single job with panic protection
    fn execute_job(id: WorkerId, job: &mut BoxedJob, stats: &PoolStats) {
        #[cfg(feature = "tracing")]
        let job_span = span!(Level::DEBUG, "job_execution", job_type = job.job_type());
        #[cfg(feature = "tracing")]
        let _job_guard = job_span.enter();

        let start = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| job.execute()));
        let elapsed = start.elapsed();
        let elapsed_us = elapsed.as_micros() as u64;

        match outcome {
            Ok(Ok(())) => {
                stats.record_processed(elapsed_us);
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_completion(id, elapsed, true);
            }
            Ok(Err(e)) => {
                log::warn!("worker {}: job '{}' failed: {}", id, job.job_type(), e);
                stats.record_failed(elapsed_us);
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_completion(id, elapsed, false);
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                log::error!(
                    "worker {}: job '{}' panicked: {}",
                    id,
                    job.job_type(),
                    panic_msg
                );
                stats.record_panicked(elapsed_us);
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_panic(id, elapsed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClosureJob;
    use std::time::Duration;

    const TEST_POOL: PoolId = 9_000;

    fn spawn_worker(
        id: WorkerId,
        intake: &Receiver<BoxedJob>,
    ) -> (Worker, Arc<PoolStats>, WaitGroup) {
        let stats = Arc::new(PoolStats::new());
        let wait_group = WaitGroup::new();
        let worker = Worker::start(
            TEST_POOL,
            id,
            intake.clone(),
            Arc::clone(&stats),
            wait_group.clone(),
            format!("test-worker-{}", id),
        )
        .expect("Failed to start worker");
        (worker, stats, wait_group)
    }

    #[test]
    fn test_worker_stop_ends_thread() {
        let (_tx, rx) = channel::bounded::<BoxedJob>(0);
        let (worker, stats, wait_group) = spawn_worker(1, &rx);

        worker.stop();
        wait_group.wait();

        assert_eq!(stats.live_workers(), 0);
        assert_eq!(stats.snapshot().workers_spawned, 1);
    }

    #[test]
    fn test_worker_exits_when_intake_closes() {
        let (tx, rx) = channel::bounded::<BoxedJob>(0);
        let (worker, stats, wait_group) = spawn_worker(2, &rx);

        drop(tx);
        wait_group.wait();

        assert_eq!(stats.live_workers(), 0);
        drop(worker);
    }

    #[test]
    fn test_worker_job_execution() {
        let (tx, rx) = channel::bounded::<BoxedJob>(0);
        let (worker, stats, wait_group) = spawn_worker(3, &rx);

        let (done_tx, done_rx) = channel::bounded(1);
        tx.send(Box::new(ClosureJob::new(move || {
            done_tx.send(()).expect("test channel closed");
            Ok(())
        })))
        .expect("worker should accept the job");

        done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("job should run");

        worker.stop();
        wait_group.wait();
        assert_eq!(stats.snapshot().jobs_processed, 1);
    }

    #[test]
    fn test_worker_survives_failure_and_panic() {
        let (tx, rx) = channel::bounded::<BoxedJob>(0);
        let (worker, stats, wait_group) = spawn_worker(4, &rx);

        tx.send(Box::new(ClosureJob::new(|| Err(PoolError::other("bad input")))))
            .expect("send failing job");
        tx.send(Box::new(ClosureJob::new(|| {
            panic!("Intentional panic for testing");
        })))
        .expect("send panicking job");

        // A rendezvous send only completes once the worker is back in its loop
        tx.send(Box::new(ClosureJob::new(|| Ok(()))))
            .expect("worker should still be alive after a panic");

        worker.stop();
        wait_group.wait();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.jobs_failed, 1);
        assert_eq!(snapshot.jobs_panicked, 1);
        assert_eq!(snapshot.jobs_processed, 1);
    }

    #[test]
    fn test_worker_thread_knows_its_pool() {
        let (tx, rx) = channel::bounded::<BoxedJob>(0);
        let (worker, _stats, wait_group) = spawn_worker(5, &rx);

        let (seen_tx, seen_rx) = channel::bounded(1);
        tx.send(Box::new(ClosureJob::new(move || {
            let _ = seen_tx.send((on_worker_of(TEST_POOL), on_worker_of(TEST_POOL + 1)));
            Ok(())
        })))
        .expect("worker should accept the job");

        let seen = seen_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("job should run");
        assert_eq!(seen, (true, false));
        assert!(!on_worker_of(TEST_POOL));

        worker.stop();
        wait_group.wait();
    }
}
