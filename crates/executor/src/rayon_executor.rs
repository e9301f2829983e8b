//! Rayon-based parallel executor.

use fixpdf_traits::Executor;
use rayon::prelude::*;
use std::sync::Arc;

/// A parallel executor on rayon's work-stealing pool.
///
/// [`new`](Self::new) uses the global pool, sized to the CPU count unless
/// the host configured it earlier. [`with_threads`](Self::with_threads)
/// builds a dedicated pool.
#[derive(Debug, Clone)]
pub struct RayonExecutor {
    pool: Option<Arc<rayon::ThreadPool>>,
    num_threads: usize,
}

impl RayonExecutor {
    pub fn new() -> Self {
        Self {
            pool: None,
            num_threads: rayon::current_num_threads(),
        }
    }

    pub fn with_threads(threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("fixpdf-worker-{}", i))
            .build()?;
        Ok(Self {
            num_threads: pool.current_num_threads(),
            pool: Some(Arc::new(pool)),
        })
    }

    fn run<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        match &self.pool {
            Some(pool) => pool.install(|| items.into_par_iter().map(f).collect()),
            None => items.into_par_iter().map(f).collect(),
        }
    }
}

impl Default for RayonExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for RayonExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        self.run(items, f)
    }

    fn parallelism(&self) -> usize {
        self.num_threads
    }

    fn name(&self) -> &'static str {
        "RayonExecutor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn preserves_input_order() {
        let executor = RayonExecutor::new();
        let results = executor.execute_all((0..64).collect::<Vec<u32>>(), |x| x * 2);
        assert_eq!(results, (0..64).map(|x| x * 2).collect::<Vec<u32>>());
    }

    #[test]
    fn dedicated_pool_reports_its_size() {
        let executor = RayonExecutor::with_threads(3).unwrap();
        assert_eq!(executor.parallelism(), 3);
        assert_eq!(executor.execute_all(vec![1, 2, 3], |x| x + 1), vec![2, 3, 4]);
    }

    #[test]
    fn runs_every_item() {
        let executor = RayonExecutor::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let _ = executor.execute_all((0..100).collect::<Vec<usize>>(), {
            let counter = counter.clone();
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }
}
