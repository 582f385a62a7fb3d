//! Runtime abstraction for work that must leave the interactive thread
//!
//! Style resource construction may block on I/O, so it is handed to a
//! [`TaskSpawner`]. Tokio, plain threads and an inline spawner (for
//! deterministic tests) are provided; hosts may install their own.

use crate::{MapError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Boxed blocking job
pub type BlockingJob = Box<dyn FnOnce() + Send + 'static>;

/// A trait for running blocking jobs off the calling thread (object-safe)
pub trait TaskSpawner: Send + Sync + 'static {
    /// Run `job` somewhere it may block, returning a handle to it
    fn spawn_blocking_boxed(&self, job: BlockingJob) -> Result<Box<dyn TaskHandle>>;
}

/// Handle to a spawned task
pub trait TaskHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Request cancellation. Jobs that already started run to completion;
    /// callers discard their output.
    fn cancel(&self);
}

/// Convenience function for spawning on the global runtime
pub fn spawn_blocking<F>(job: F) -> Result<Box<dyn TaskHandle>>
where
    F: FnOnce() + Send + 'static,
{
    runtime().spawn_blocking_boxed(Box::new(job))
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    /// Shared finished/cancelled flags for spawners without a native handle
    #[derive(Debug, Clone, Default)]
    struct FlagHandle {
        finished: Arc<AtomicBool>,
        cancelled: Arc<AtomicBool>,
    }

    impl TaskHandle for FlagHandle {
        fn is_finished(&self) -> bool {
            self.finished.load(Ordering::Acquire)
        }

        fn cancel(&self) {
            self.cancelled.store(true, Ordering::Release);
        }
    }

    /// Runs each job on a dedicated OS thread
    #[derive(Debug, Default, Clone, Copy)]
    pub struct ThreadSpawner;

    impl TaskSpawner for ThreadSpawner {
        fn spawn_blocking_boxed(&self, job: BlockingJob) -> Result<Box<dyn TaskHandle>> {
            let handle = FlagHandle::default();
            let flags = handle.clone();
            std::thread::Builder::new()
                .name("mapnav-blocking".to_string())
                .spawn(move || {
                    if !flags.cancelled.load(Ordering::Acquire) {
                        job();
                    }
                    flags.finished.store(true, Ordering::Release);
                })
                .map_err(|e| MapError::Runtime(format!("failed to spawn thread: {}", e)))?;
            Ok(Box::new(handle))
        }
    }

    /// Runs each job immediately on the calling thread
    #[derive(Debug, Default, Clone, Copy)]
    pub struct InlineSpawner;

    impl TaskSpawner for InlineSpawner {
        fn spawn_blocking_boxed(&self, job: BlockingJob) -> Result<Box<dyn TaskHandle>> {
            job();
            let handle = FlagHandle::default();
            handle.finished.store(true, Ordering::Release);
            Ok(Box::new(handle))
        }
    }

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based spawner. Uses the blocking pool of the ambient
        /// runtime and falls back to a thread outside of one.
        #[derive(Debug, Default, Clone, Copy)]
        pub struct TokioSpawner;

        impl TaskSpawner for TokioSpawner {
            fn spawn_blocking_boxed(&self, job: BlockingJob) -> Result<Box<dyn TaskHandle>> {
                match ::tokio::runtime::Handle::try_current() {
                    Ok(handle) => Ok(Box::new(TokioHandle(handle.spawn_blocking(job)))),
                    Err(_) => {
                        log::debug!("no tokio runtime in scope, spawning a thread instead");
                        ThreadSpawner.spawn_blocking_boxed(job)
                    }
                }
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl TaskHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }

            fn cancel(&self) {
                self.0.abort();
            }
        }
    }
}

/// Global runtime instance
static RUNTIME: OnceLock<Arc<dyn TaskSpawner>> = OnceLock::new();

/// Initialize the runtime with a specific spawner. Has no effect once the
/// global runtime has been used.
pub fn init_runtime(spawner: Arc<dyn TaskSpawner>) -> bool {
    RUNTIME.set(spawner).is_ok()
}

/// Get the global runtime spawner
pub fn runtime() -> Arc<dyn TaskSpawner> {
    Arc::clone(RUNTIME.get_or_init(|| {
        #[cfg(feature = "tokio-runtime")]
        {
            Arc::new(spawners::tokio_impl::TokioSpawner)
        }

        #[cfg(not(feature = "tokio-runtime"))]
        {
            Arc::new(spawners::ThreadSpawner)
        }
    }))
}
