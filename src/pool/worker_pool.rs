//! Worker pool façade

use crate::core::{BoxedJob, ClosureJob, Job, PoolError, Result};
use crate::pool::command::{Action, Command};
use crate::pool::config::WorkerPoolConfig;
use crate::pool::controller::{Controller, Registry};
use crate::pool::stats::{PoolStats, PoolStatsSnapshot};
use crate::pool::worker::{on_worker_of, PoolId};
use crossbeam::channel::{self, select, Receiver, Sender};
use crossbeam::sync::WaitGroup;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

const OPEN: u8 = 0;
const CLOSING: u8 = 1;
const CLOSED: u8 = 2;

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle of a pool. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    /// Accepting commands and jobs
    Open,
    /// `close` has started and is waiting for workers to exit.
    ///
    /// A pool closed from one of its own workers stays here, since nothing
    /// waits for its threads.
    Closing,
    /// Every worker and the controller have exited
    Closed,
}

impl PoolState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            OPEN => PoolState::Open,
            CLOSING => PoolState::Closing,
            _ => PoolState::Closed,
        }
    }
}

/// A pool whose worker count can change while it runs.
///
/// # Structure
///
/// A dedicated controller thread owns the worker registry and applies add,
/// remove and resize requests one at a time. Jobs bypass the controller:
/// [`submit`](WorkerPool::submit) hands a job straight to whichever worker is
/// ready, over a rendezvous channel, so a successful submit means a worker
/// has taken the job.
///
/// # Shutdown
///
/// [`close`](WorkerPool::close) flips a one-way flag, disconnects the stop
/// channel, lets the controller stop every worker and then waits until all
/// worker threads (including previously removed ones still finishing a job)
/// and the controller have exited. Every blocking call races its channel
/// operation against the stop channel, so a call in flight during `close`
/// returns [`PoolError::Closed`] instead of hanging.
///
/// Jobs that no worker has taken when `close` begins are dropped.
///
/// # Example
///
/// ```rust
/// use dynamic_worker_pool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pool = WorkerPool::new()?;
/// assert_eq!(pool.running(), 0);
///
/// pool.add_worker()?;
/// pool.add_worker()?;
/// assert_eq!(pool.running(), 2);
///
/// pool.execute(|| {
///     println!("hello from a worker");
///     Ok(())
/// })?;
///
/// pool.remove_worker()?;
/// pool.close();
/// assert!(pool.is_closed());
/// assert!(matches!(pool.add_worker(), Err(PoolError::Closed)));
/// # Ok(())
/// # }
/// ```
pub struct WorkerPool {
    id: PoolId,
    config: WorkerPoolConfig,
    intake: Sender<BoxedJob>,
    commands: Sender<Command>,
    stop: Receiver<()>,
    stop_signal: Mutex<Option<Sender<()>>>,
    registry: Arc<RwLock<Registry>>,
    stats: Arc<PoolStats>,
    state: AtomicU8,
    wait_group: Mutex<Option<WaitGroup>>,
    controller: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("running", &self.running())
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

impl WorkerPool {
    /// Create an empty pool with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(WorkerPoolConfig::default())
    }

    /// Create a pool with custom configuration.
    ///
    /// The controller is running when this returns, and
    /// `config.initial_workers` workers have been added through it.
    pub fn with_config(config: WorkerPoolConfig) -> Result<Self> {
        config.validate()?;

        let (intake, intake_rx) = channel::bounded(0);
        let (commands, commands_rx) = channel::bounded(0);
        let (stop_signal, stop) = channel::bounded(0);
        let registry = Arc::new(RwLock::new(Registry::default()));
        let stats = Arc::new(PoolStats::new());
        let wait_group = WaitGroup::new();
        let id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);

        let controller = Controller {
            pool: id,
            config: config.clone(),
            registry: Arc::clone(&registry),
            intake: intake_rx,
            commands: commands_rx,
            stop: stop.clone(),
            stats: Arc::clone(&stats),
            wait_group: wait_group.clone(),
        }
        .spawn()?;

        let pool = Self {
            id,
            config,
            intake,
            commands,
            stop,
            stop_signal: Mutex::new(Some(stop_signal)),
            registry,
            stats,
            state: AtomicU8::new(OPEN),
            wait_group: Mutex::new(Some(wait_group)),
            controller: Mutex::new(Some(controller)),
        };

        if pool.config.initial_workers > 0 {
            pool.resize(pool.config.initial_workers)?;
        }

        log::debug!(
            "pool '{}' created with {} workers",
            pool.config.name,
            pool.running()
        );
        Ok(pool)
    }

    /// Add one worker.
    ///
    /// Blocks until the controller has spawned and registered it.
    ///
    /// # Errors
    ///
    /// - `PoolError::Closed` - the pool is closing or closed
    /// - `PoolError::SpawnError` - the OS refused a new thread
    pub fn add_worker(&self) -> Result<()> {
        self.dispatch(Action::AddWorker).map(|_| ())
    }

    /// Remove the most recently added worker.
    ///
    /// Returns once the worker has been signalled; its thread finishes any job
    /// it already holds and exits on its own.
    ///
    /// # Errors
    ///
    /// - `PoolError::Closed` - the pool is closing or closed
    /// - `PoolError::NoWorkers` - there was no worker to remove
    pub fn remove_worker(&self) -> Result<()> {
        self.dispatch(Action::RemoveWorker).map(|_| ())
    }

    /// Add or remove workers until exactly `target` are registered.
    ///
    /// Applied by the controller as one step, so no other add or remove is
    /// interleaved. Returns the resulting worker count.
    ///
    /// # Errors
    ///
    /// - `PoolError::Closed` - the pool is closing or closed
    /// - `PoolError::SpawnError` - growing stopped part way; workers added
    ///   before the failure stay registered
    pub fn resize(&self, target: usize) -> Result<usize> {
        self.dispatch(Action::Resize(target))
    }

    /// Submit a job.
    ///
    /// Blocks until a worker takes the job. With no workers registered this
    /// waits for one to be added, or for the pool to close.
    ///
    /// # Errors
    ///
    /// - `PoolError::Closed` - the pool is closing or closed; the job is dropped
    pub fn submit<J: Job + 'static>(&self, job: J) -> Result<()> {
        self.submit_boxed(Box::new(job))
    }

    /// Submit a closure as a job
    pub fn execute<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.submit(ClosureJob::new(f))
    }

    fn submit_boxed(&self, job: BoxedJob) -> Result<()> {
        if self.is_closed() {
            return Err(PoolError::Closed);
        }

        select! {
            recv(self.stop) -> _ => Err(PoolError::Closed),
            send(self.intake, job) -> sent => match sent {
                Ok(()) => {
                    self.stats.record_submitted();
                    #[cfg(feature = "tracing")]
                    crate::tracing::metrics::record_submission();
                    Ok(())
                }
                Err(_) => Err(PoolError::Closed),
            },
        }
    }

    /// Send a command to the controller and wait for its answer
    fn dispatch(&self, action: Action) -> Result<usize> {
        if self.is_closed() {
            return Err(PoolError::Closed);
        }

        let (cmd, outcome) = Command::new(action);
        select! {
            recv(self.stop) -> _ => Err(PoolError::Closed),
            send(self.commands, cmd) -> sent => match sent {
                Ok(()) => outcome.recv().unwrap_or(Err(PoolError::Closed)),
                Err(_) => Err(PoolError::Closed),
            },
        }
    }

    /// Number of registered workers.
    ///
    /// A snapshot: concurrent adds and removes make it stale immediately.
    pub fn running(&self) -> usize {
        self.registry.read().len()
    }

    /// Worker threads still alive, including removed ones finishing a job.
    ///
    /// Zero once `close` has returned.
    pub fn live_workers(&self) -> usize {
        self.stats.live_workers() as usize
    }

    /// Get pool-wide job and worker counters
    pub fn stats(&self) -> PoolStatsSnapshot {
        self.stats.snapshot()
    }

    /// Get the pool's configuration
    pub fn config(&self) -> &WorkerPoolConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> PoolState {
        PoolState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// True once `close` has been called, even while it is still running
    pub fn is_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) != OPEN
    }

    /// Shut the pool down and wait for every worker thread to exit.
    ///
    /// Only the first call does anything; later or concurrent calls return
    /// immediately. Jobs already taken by a worker run to completion, jobs not
    /// yet taken are dropped.
    ///
    /// Called from a job running on this pool, including when the last
    /// `Arc<WorkerPool>` is dropped inside a job, the pool is shut down the
    /// same way but nothing waits: the calling worker cannot exit before its
    /// job returns. The workers and controller exit on their own afterwards
    /// and the state stays [`PoolState::Closing`].
    pub fn close(&self) {
        if self
            .state
            .compare_exchange(OPEN, CLOSING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        log::info!(
            "pool '{}' closing with {} workers running",
            self.config.name,
            self.running()
        );

        // Disconnecting the stop channel wakes the controller and every
        // blocked submit/add/remove at once
        drop(self.stop_signal.lock().take());

        if on_worker_of(self.id) {
            log::warn!(
                "pool '{}' closed from one of its own workers; not waiting for threads to exit",
                self.config.name
            );
            drop(self.wait_group.lock().take());
            drop(self.controller.lock().take());
            return;
        }

        let wait_group = self.wait_group.lock().take();
        if let Some(wait_group) = wait_group {
            wait_group.wait();
        }

        let controller = self.controller.lock().take();
        if let Some(controller) = controller {
            if let Err(e) = controller
                .join()
                .map_err(|_| PoolError::join(&self.config.name, "controller panicked"))
            {
                log::error!("{}", e);
            }
        }

        self.state.store(CLOSED, Ordering::Release);

        let stats = self.stats.snapshot();
        log::info!(
            "pool '{}' closed: {} jobs processed, {} failed, {} panicked",
            self.config.name,
            stats.jobs_processed,
            stats.jobs_failed,
            stats.jobs_panicked
        );
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_pool_close(&self.config.name, &stats);
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.close();
    }
}
