//! Configuration for [`WorkerPool`](crate::pool::WorkerPool).

use crate::core::{PoolError, Result};

/// Configuration for a worker pool.
///
/// # Example
///
/// ```rust
/// use dynamic_worker_pool::WorkerPoolConfig;
///
/// let config = WorkerPoolConfig::new("ingest")
///     .with_thread_name_prefix("ingest-worker")
///     .with_initial_workers(4);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct WorkerPoolConfig {
    /// Pool name used in log lines and errors
    pub name: String,
    /// Worker threads are named `<prefix>-<id>`, the controller `<prefix>-controller`
    pub thread_name_prefix: String,
    /// Workers added through the controller right after construction
    pub initial_workers: usize,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            name: "worker-pool".to_string(),
            thread_name_prefix: "worker".to_string(),
            initial_workers: 0,
        }
    }
}

impl WorkerPoolConfig {
    /// Create a configuration for a named pool with no initial workers
    #[must_use]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Set the number of workers present once construction returns
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_initial_workers(mut self, count: usize) -> Self {
        self.initial_workers = count;
        self
    }

    pub(crate) fn worker_thread_name(&self, id: u64) -> String {
        format!("{}-{}", self.thread_name_prefix, id)
    }

    pub(crate) fn controller_thread_name(&self) -> String {
        format!("{}-controller", self.thread_name_prefix)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(PoolError::invalid_config("name", "Pool name must not be empty"));
        }
        if self.thread_name_prefix.is_empty() {
            return Err(PoolError::invalid_config(
                "thread_name_prefix",
                "Thread name prefix must not be empty",
            ));
        }
        // std::thread::Builder panics on names with interior NUL bytes
        if self.thread_name_prefix.contains('\0') {
            return Err(PoolError::invalid_config(
                "thread_name_prefix",
                "Thread name prefix must not contain NUL bytes",
            ));
        }
        Ok(())
    }
}
