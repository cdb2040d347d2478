//! The controller thread: sole writer of the worker registry.
//!
//! Every add, remove and resize request, and finally the shutdown itself, is
//! applied by one thread in the order it was received. The façade never
//! touches the registry except to read its size.

use crate::core::{BoxedJob, PoolError, Result};
use crate::pool::command::{Action, Command};
use crate::pool::config::WorkerPoolConfig;
use crate::pool::stats::PoolStats;
use crate::pool::worker::{PoolId, Worker, WorkerId};
use crossbeam::channel::{select, Receiver};
use crossbeam::sync::WaitGroup;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Live workers keyed by id, plus the id counter.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    workers: BTreeMap<WorkerId, Worker>,
    last_id: WorkerId,
}

impl Registry {
    pub(crate) fn len(&self) -> usize {
        self.workers.len()
    }

    fn next_id(&mut self) -> WorkerId {
        self.last_id += 1;
        self.last_id
    }
}

/// State moved onto the controller thread.
pub(crate) struct Controller {
    pub(crate) pool: PoolId,
    pub(crate) config: WorkerPoolConfig,
    pub(crate) registry: Arc<RwLock<Registry>>,
    pub(crate) intake: Receiver<BoxedJob>,
    pub(crate) commands: Receiver<Command>,
    pub(crate) stop: Receiver<()>,
    pub(crate) stats: Arc<PoolStats>,
    pub(crate) wait_group: WaitGroup,
}

impl Controller {
    /// Launch the controller loop on its own named thread
    pub(crate) fn spawn(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(self.config.controller_thread_name())
            .spawn(move || self.run())
            .map_err(|e| PoolError::spawn_with_source(0, e))
    }

    /// Apply commands until the stop signal fires, then stop every worker.
    ///
    /// A disconnected command channel means the façade is gone and is treated
    /// the same as a stop signal.
    fn run(self) {
        log::debug!("pool '{}': controller running", self.config.name);

        loop {
            select! {
                recv(self.stop) -> _ => break,
                recv(self.commands) -> msg => match msg {
                    Ok(cmd) => self.handle(cmd),
                    Err(_) => break,
                },
            }
        }

        self.release_all_workers();
        log::debug!("pool '{}': controller terminated", self.config.name);
    }

    fn handle(&self, cmd: Command) {
        let mut registry = self.registry.write();
        let result = match cmd.action() {
            Action::AddWorker => self.add_worker(&mut registry),
            Action::RemoveWorker => self.remove_worker(&mut registry),
            Action::Resize(target) => self.resize(&mut registry, target),
        };
        drop(registry);
        cmd.respond(result);
    }

    fn add_worker(&self, registry: &mut Registry) -> Result<usize> {
        // Ids are consumed even if the spawn fails, so none is ever handed out twice
        let id = registry.next_id();
        let worker = Worker::start(
            self.pool,
            id,
            self.intake.clone(),
            Arc::clone(&self.stats),
            self.wait_group.clone(),
            self.config.worker_thread_name(id),
        )?;
        registry.workers.insert(id, worker);

        let running = registry.len();
        log::debug!(
            "pool '{}': worker {} added ({} running)",
            self.config.name,
            id,
            running
        );
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_worker_added(id, running);

        Ok(running)
    }

    /// Stop and erase the newest worker without waiting for its thread.
    fn remove_worker(&self, registry: &mut Registry) -> Result<usize> {
        let (id, worker) = registry.workers.pop_last().ok_or(PoolError::NoWorkers)?;
        worker.stop();

        let running = registry.len();
        log::debug!(
            "pool '{}': worker {} removed ({} running)",
            self.config.name,
            id,
            running
        );
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_worker_removed(id, running);

        Ok(running)
    }

    fn resize(&self, registry: &mut Registry, target: usize) -> Result<usize> {
        while registry.len() < target {
            self.add_worker(registry)?;
        }
        while registry.len() > target {
            self.remove_worker(registry)?;
        }
        Ok(registry.len())
    }

    fn release_all_workers(&self) {
        let workers = std::mem::take(&mut self.registry.write().workers);
        let count = workers.len();
        for worker in workers.into_values() {
            worker.stop();
        }
        log::debug!(
            "pool '{}': released {} workers on shutdown",
            self.config.name,
            count
        );
    }
}
