use std::env;
use std::sync::OnceLock;

use crate::env::NUM_THREADS_VAR;

/// A wrapper around the Rayon thread pool used to run multiplications.
///
/// On platforms where threads are not supported (eg. WebAssembly) this runs
/// operations directly on the calling thread.
pub struct ThreadPool {
    /// The wrapped thread pool, or None if we failed to construct one.
    pool: Option<rayon::ThreadPool>,
}

impl ThreadPool {
    /// Run a function in the thread pool.
    ///
    /// This corresponds to [`rayon::ThreadPool::install`], except on platforms
    /// where threading is not supported, where it just runs `op` directly.
    pub fn run<R: Send, Op: FnOnce() -> R + Send>(&self, op: Op) -> R {
        if let Some(pool) = self.pool.as_ref() {
            pool.install(op)
        } else {
            op()
        }
    }

    /// Create a thread pool with a given number of threads.
    pub fn with_num_threads(num_threads: usize) -> ThreadPool {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("mspgemm-{}", index))
            .build();

        if let Err(err) = &pool {
            log::warn!("failed to create thread pool, running serially: {}", err);
        }

        ThreadPool { pool: pool.ok() }
    }

    /// Return the number of threads in the pool.
    pub fn num_threads(&self) -> usize {
        self.pool
            .as_ref()
            .map(|pool| pool.current_num_threads())
            .unwrap_or(1)
    }
}

/// Parse the value of the thread count variable, falling back to `default`
/// if it is not a number.
fn parse_thread_count(value: &str, default: usize, max: usize) -> usize {
    match value.parse::<usize>() {
        Ok(n_threads) => n_threads.clamp(1, max.max(1)),
        Err(_) => {
            log::warn!(
                "ignoring invalid {} value \"{}\", using {} threads",
                NUM_THREADS_VAR,
                value,
                default
            );
            default
        }
    }
}

/// Return the thread pool which is used to execute multiplications.
///
/// This differs from Rayon's default global thread pool in that it is tuned for
/// CPU rather than IO-bound work by choosing a thread count based on the number
/// of physical rather than logical cores.
///
/// The thread count can be overridden at the process level by setting the
/// `MSPGEMM_NUM_THREADS` environment variable, whose value must be a number
/// between 1 and the logical core count.
pub fn thread_pool() -> &'static ThreadPool {
    static THREAD_POOL: OnceLock<ThreadPool> = OnceLock::new();
    THREAD_POOL.get_or_init(|| {
        let physical_cpus = num_cpus::get_physical().max(1);

        let num_threads = if let Some(threads_var) = env::var_os(NUM_THREADS_VAR) {
            parse_thread_count(&threads_var.to_string_lossy(), physical_cpus, num_cpus::get())
        } else {
            physical_cpus
        };
        log::debug!("creating thread pool with {} threads", num_threads);

        ThreadPool::with_num_threads(num_threads)
    })
}
