//! # Dynamic Worker Pool
//!
//! A thread pool whose worker count changes at runtime, fed by a single job
//! stream, with serialized control over the worker count and a shutdown that
//! never leaks threads.
//!
//! ## Features
//!
//! - **Runtime resizing**: add, remove or resize workers while jobs flow
//! - **Single controller**: every registry mutation is applied by one thread,
//!   in order, through request/reply commands
//! - **Direct handoff**: jobs go straight to the next idle worker over a
//!   rendezvous channel built on crossbeam
//! - **Safe shutdown**: `close` races every in-flight call against a stop
//!   channel, so callers get [`PoolError::Closed`] instead of a hang
//! - **Panic isolation**: a panicking job is logged and counted, the worker
//!   keeps serving
//!
//! ## Quick Start
//!
//! ```rust
//! use dynamic_worker_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let pool = WorkerPool::new()?;
//!
//! for _ in 0..4 {
//!     pool.add_worker()?;
//! }
//!
//! for i in 0..10 {
//!     pool.execute(move || {
//!         println!("Job {} executing", i);
//!         Ok(())
//!     })?;
//! }
//!
//! pool.close();
//! assert_eq!(pool.live_workers(), 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Resizing
//!
//! ```rust
//! use dynamic_worker_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let config = WorkerPoolConfig::new("resizing")
//!     .with_thread_name_prefix("resize-worker")
//!     .with_initial_workers(2);
//!
//! let pool = WorkerPool::with_config(config)?;
//! assert_eq!(pool.running(), 2);
//!
//! assert_eq!(pool.resize(8)?, 8);
//! pool.remove_worker()?;
//! assert_eq!(pool.running(), 7);
//!
//! assert_eq!(pool.resize(0)?, 0);
//! assert!(matches!(pool.remove_worker(), Err(PoolError::NoWorkers)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Jobs
//!
//! ```rust
//! use dynamic_worker_pool::prelude::*;
//!
//! struct Greeting {
//!     name: String,
//! }
//!
//! impl Job for Greeting {
//!     fn execute(&mut self) -> Result<()> {
//!         println!("Hello, {}", self.name);
//!         Ok(())
//!     }
//!
//!     fn job_type(&self) -> &str {
//!         "Greeting"
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! # let pool = WorkerPool::with_config(WorkerPoolConfig::default().with_initial_workers(1))?;
//! pool.submit(Greeting {
//!     name: "pool".to_string(),
//! })?;
//! # pool.close();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;
#[cfg(feature = "tracing")]
pub mod tracing;

pub use crate::core::{BoxedJob, ClosureJob, Job, PoolError, Result};
pub use crate::pool::{PoolState, PoolStatsSnapshot, WorkerId, WorkerPool, WorkerPoolConfig};
