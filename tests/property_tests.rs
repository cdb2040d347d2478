//! Property-based tests for dynamic_worker_pool using proptest

use dynamic_worker_pool::prelude::*;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    Add,
    Remove,
    Resize(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Add),
        3 => Just(Op::Remove),
        1 => (0usize..16).prop_map(Op::Resize),
    ]
}

// ============================================================================
// Worker Count Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// N successful adds with no removals leave exactly N workers
    #[test]
    fn test_running_matches_adds(n in 0usize..64) {
        let pool = WorkerPool::new().unwrap();
        for _ in 0..n {
            pool.add_worker().unwrap();
        }
        prop_assert_eq!(pool.running(), n);

        pool.close();
        prop_assert_eq!(pool.live_workers(), 0);
    }

    /// A sequential mix of operations tracks a simple counter model
    #[test]
    fn test_operations_follow_model(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let pool = WorkerPool::new().unwrap();
        let mut model = 0usize;

        for op in ops {
            match op {
                Op::Add => {
                    pool.add_worker().unwrap();
                    model += 1;
                }
                Op::Remove => {
                    let result = pool.remove_worker();
                    if model == 0 {
                        prop_assert!(matches!(result, Err(PoolError::NoWorkers)));
                    } else {
                        prop_assert!(result.is_ok());
                        model -= 1;
                    }
                }
                Op::Resize(target) => {
                    prop_assert_eq!(pool.resize(target).unwrap(), target);
                    model = target;
                }
            }
            prop_assert_eq!(pool.running(), model);
        }

        pool.close();
        prop_assert_eq!(pool.live_workers(), 0);
    }
}

// ============================================================================
// Job Delivery Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Every accepted job is processed exactly once before close returns
    #[test]
    fn test_accepted_jobs_processed_once(workers in 1usize..8, jobs in 1usize..100) {
        let pool = WorkerPool::with_config(
            WorkerPoolConfig::default().with_initial_workers(workers),
        ).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..jobs {
            let counter = Arc::clone(&counter);
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }).unwrap();
        }

        pool.close();

        prop_assert_eq!(counter.load(Ordering::SeqCst), jobs);
        prop_assert_eq!(pool.stats().jobs_processed, jobs as u64);
    }

    /// Close is safe at any pool size and any number of times
    #[test]
    fn test_close_always_safe(workers in 0usize..32, closes in 1usize..4) {
        let pool = WorkerPool::new().unwrap();
        pool.resize(workers).unwrap();

        for _ in 0..closes {
            pool.close();
        }

        prop_assert!(pool.is_closed());
        prop_assert_eq!(pool.running(), 0);
        prop_assert!(matches!(pool.add_worker(), Err(PoolError::Closed)));
    }
}
