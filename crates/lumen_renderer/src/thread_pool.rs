//! Fixed-size worker pool on top of a dedicated rayon pool.
//!
//! Submitted closures are spawned in FIFO order and each one hands back a
//! [`TaskHandle`] that yields its result. Shutdown waits for every queued job
//! to finish, then for every worker thread to exit.

use crate::TaskError;
use rayon::prelude::*;
use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, sync_channel, Receiver, Sender};
use std::thread;

/// Stack size for worker threads; path recursion can run deep.
const WORKER_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Pending result of a submitted task.
pub struct TaskHandle<T> {
    receiver: Receiver<thread::Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Block until the task finishes.
    pub fn wait(self) -> Result<T, TaskError> {
        match self.receiver.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => Err(TaskError::Panicked(panic_message(payload.as_ref()))),
            Err(_) => Err(TaskError::Dropped),
        }
    }
}

/// Running pool state; taken on shutdown.
struct Workers {
    pool: rayon::ThreadPool,
    /// Cloned into every job; the receiver disconnects once all are done.
    in_flight: Sender<()>,
}

pub struct ThreadPool {
    workers: Option<Workers>,
    drained: Receiver<()>,
    exited: Receiver<()>,
    size: usize,
}

impl ThreadPool {
    /// Start `size` worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        assert!(size > 0, "thread pool needs at least one worker");

        let (exit_tx, exited) = channel();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|id| format!("lumen-worker-{id}"))
            .stack_size(WORKER_STACK_SIZE)
            .exit_handler(move |_| {
                let _ = exit_tx.send(());
            })
            .build()?;
        let (in_flight, drained) = channel();

        log::debug!("thread pool started with {size} workers");
        Ok(Self {
            workers: Some(Workers { pool, in_flight }),
            drained,
            exited,
            size,
        })
    }

    /// One worker per hardware thread.
    pub fn with_available_parallelism() -> Result<Self, rayon::ThreadPoolBuildError> {
        Self::new(available_parallelism())
    }

    /// Worker count; zero after shutdown.
    pub fn thread_count(&self) -> usize {
        self.workers
            .as_ref()
            .map_or(0, |w| w.pool.current_num_threads())
    }

    /// Queue `task` and return a handle to its result.
    ///
    /// Never waits for other work to complete. A panicking task is caught and
    /// reported through its handle; the worker keeps running.
    ///
    /// # Panics
    ///
    /// Panics if the pool has been shut down.
    pub fn submit<T, F>(&self, task: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let workers = self.live("submit");
        let (sender, receiver) = sync_channel(1);
        let in_flight = workers.in_flight.clone();
        workers.pool.spawn_fifo(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(task));
            if let Err(payload) = &result {
                log::error!(
                    "task panicked on {}: {}",
                    thread::current().name().unwrap_or("worker"),
                    panic_message(payload.as_ref())
                );
            }
            // The caller may have dropped the handle; nothing to report then.
            let _ = sender.send(result);
            drop(in_flight);
        });

        TaskHandle { receiver }
    }

    /// Split `range` into one contiguous chunk per worker and run `body` on
    /// each chunk in parallel, returning once all chunks are done. The last
    /// chunk absorbs the remainder. Panics in `body` propagate to the caller.
    ///
    /// # Panics
    ///
    /// Panics if the pool has been shut down.
    pub fn parallel_for<F>(&self, range: Range<usize>, body: F)
    where
        F: Fn(Range<usize>) + Send + Sync,
    {
        let workers = self.live("parallel_for");
        let chunks = split_range(range, workers.pool.current_num_threads());
        workers
            .pool
            .install(|| chunks.into_par_iter().for_each(body));
    }

    /// Finish all queued work, then wait for every worker to exit. Idempotent.
    pub fn shutdown(&mut self) {
        let Some(Workers { pool, in_flight }) = self.workers.take() else {
            return;
        };

        drop(in_flight);
        // Disconnects once the last queued job has dropped its sender.
        while self.drained.recv().is_ok() {}
        drop(pool);

        for _ in 0..self.size {
            if self.exited.recv().is_err() {
                log::error!("worker thread exited abnormally");
                break;
            }
        }
        log::debug!("thread pool joined {} workers", self.size);
    }

    fn live(&self, operation: &str) -> &Workers {
        match &self.workers {
            Some(workers) => workers,
            None => panic!("{operation} called on a thread pool that was shut down"),
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// `parts` contiguous chunks covering `range`; the last takes the remainder.
fn split_range(range: Range<usize>, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1).min(range.len().max(1));
    let workload = range.len() / parts;
    (0..parts)
        .map(|i| {
            let start = range.start + workload * i;
            let end = if i == parts - 1 {
                range.end
            } else {
                start + workload
            };
            start..end
        })
        .collect()
}

/// Hardware concurrency, falling back to one thread.
pub(crate) fn available_parallelism() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
