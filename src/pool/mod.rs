//! Worker pool, its controller and workers

mod command;
mod controller;
pub mod config;
pub mod stats;
mod worker;
pub mod worker_pool;

pub use config::WorkerPoolConfig;
pub use stats::PoolStatsSnapshot;
pub use worker::WorkerId;
pub use worker_pool::{PoolState, WorkerPool};
