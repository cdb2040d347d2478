use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use dynamic_worker_pool::prelude::*;
use std::sync::Arc;
use std::thread;

fn benchmark_pool_creation(c: &mut Criterion) {
    c.bench_function("pool_creation_and_close", |b| {
        b.iter(|| {
            let pool = WorkerPool::new().expect("Failed to create pool");
            pool.close();
        });
    });
}

fn benchmark_worker_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("worker_churn");

    group.bench_function("add_remove_single", |b| {
        let pool = WorkerPool::new().expect("Failed to create pool");
        b.iter(|| {
            pool.add_worker().expect("Failed to add worker");
            pool.remove_worker().expect("Failed to remove worker");
        });
        pool.close();
    });

    group.bench_function("resize_0_64_0", |b| {
        let pool = WorkerPool::new().expect("Failed to create pool");
        b.iter(|| {
            black_box(pool.resize(64).expect("Failed to grow"));
            black_box(pool.resize(0).expect("Failed to shrink"));
        });
        pool.close();
    });

    group.finish();
}

fn benchmark_job_submission(c: &mut Criterion) {
    let mut group = c.benchmark_group("job_submission");

    group.bench_function("lightweight_jobs_100", |b| {
        b.iter_batched(
            || {
                WorkerPool::with_config(WorkerPoolConfig::default().with_initial_workers(4))
                    .expect("Failed to create pool")
            },
            |pool| {
                for _ in 0..100 {
                    pool.execute(|| {
                        black_box(1 + 1);
                        Ok(())
                    })
                    .expect("Failed to submit job");
                }
                pool.close();
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("concurrent_submission_4_threads", |b| {
        b.iter_batched(
            || {
                Arc::new(
                    WorkerPool::with_config(WorkerPoolConfig::default().with_initial_workers(4))
                        .expect("Failed to create pool"),
                )
            },
            |pool| {
                let submitters: Vec<_> = (0..4)
                    .map(|_| {
                        let pool = Arc::clone(&pool);
                        thread::spawn(move || {
                            for _ in 0..25 {
                                pool.execute(|| Ok(())).expect("Failed to submit job");
                            }
                        })
                    })
                    .collect();
                for submitter in submitters {
                    submitter.join().expect("Submitter panicked");
                }
                pool.close();
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_pool_creation,
    benchmark_worker_churn,
    benchmark_job_submission
);
criterion_main!(benches);
