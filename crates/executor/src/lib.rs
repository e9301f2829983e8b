//! Executors for running independent conversion jobs.
//!
//! ## Available Executors
//!
//! - [`RayonExecutor`]: work-stealing thread pool (feature: `rayon`)
//! - [`SyncExecutor`]: sequential execution (re-exported from fixpdf-traits)
//!
//! Both preserve input order in their results, so a batch of conversion jobs
//! reports back in the order it was submitted.

#[cfg(feature = "rayon")]
mod rayon_executor;

#[cfg(feature = "rayon")]
pub use rayon_executor::RayonExecutor;

pub use fixpdf_traits::{Executor, SyncExecutor};

/// A type-erased executor that wraps concrete executor implementations.
///
/// `Executor` has generic methods and cannot be a trait object, so the
/// converter stores this enum instead.
#[derive(Clone, Debug)]
pub enum ExecutorImpl {
    Sync(SyncExecutor),
    #[cfg(feature = "rayon")]
    Rayon(RayonExecutor),
}

impl ExecutorImpl {
    pub fn sequential() -> Self {
        ExecutorImpl::Sync(SyncExecutor::new())
    }

    /// A parallel executor with `threads` workers, or rayon's global pool
    /// when `threads` is `None`. Falls back to sequential execution when
    /// rayon is not compiled in or `threads` is `Some(1)`.
    pub fn parallel(threads: Option<usize>) -> Self {
        if threads == Some(1) {
            return Self::sequential();
        }
        #[cfg(feature = "rayon")]
        {
            match threads {
                Some(n) => match RayonExecutor::with_threads(n) {
                    Ok(exec) => ExecutorImpl::Rayon(exec),
                    Err(e) => {
                        log::warn!("Could not build a {}-thread pool ({}); using the global pool", n, e);
                        ExecutorImpl::Rayon(RayonExecutor::new())
                    }
                },
                None => ExecutorImpl::Rayon(RayonExecutor::new()),
            }
        }
        #[cfg(not(feature = "rayon"))]
        {
            log::debug!("rayon support not compiled in; running jobs sequentially");
            Self::sequential()
        }
    }
}

impl Executor for ExecutorImpl {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        match self {
            ExecutorImpl::Sync(exec) => exec.execute_all(items, f),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.execute_all(items, f),
        }
    }

    fn execute_all_fallible<T, R, E, F>(&self, items: Vec<T>, f: F) -> Vec<Result<R, E>>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + Clone + 'static,
    {
        match self {
            ExecutorImpl::Sync(exec) => exec.execute_all_fallible(items, f),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.execute_all_fallible(items, f),
        }
    }

    fn parallelism(&self) -> usize {
        match self {
            ExecutorImpl::Sync(exec) => exec.parallelism(),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.parallelism(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ExecutorImpl::Sync(exec) => exec.name(),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.name(),
        }
    }
}

impl Default for ExecutorImpl {
    fn default() -> Self {
        Self::parallel(None)
    }
}
