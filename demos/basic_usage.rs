//! Basic worker pool usage
//!
//! Starts an empty pool, grows it to ten workers and hands it five tasks.
//!
//! Run with: cargo run --example basic_usage

use dynamic_worker_pool::prelude::*;
use std::thread;

struct Task {
    payload: String,
}

impl Job for Task {
    fn execute(&mut self) -> Result<()> {
        println!(
            "{} is processing {}",
            thread::current().name().unwrap_or("unnamed"),
            self.payload
        );
        Ok(())
    }

    fn job_type(&self) -> &str {
        "Task"
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let pool = WorkerPool::new()?;

    const NUM_WORKERS: usize = 10;
    for _ in 0..NUM_WORKERS {
        pool.add_worker()?;
    }
    println!("Running workers: {}", pool.running());

    const NUM_TASKS: usize = 5;
    for i in 0..NUM_TASKS {
        pool.submit(Task {
            payload: format!("task {}", i),
        })?;
    }

    pool.close();

    let stats = pool.stats();
    println!(
        "Processed {} of {} tasks on {} worker threads",
        stats.jobs_processed, stats.jobs_submitted, stats.workers_spawned
    );

    Ok(())
}
