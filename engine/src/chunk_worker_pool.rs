use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crossbeam_channel::{Receiver, TryRecvError};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::WorkerError;

pub type JobResult<R> = Result<R, WorkerError>;

/// A fixed-size pool of threads running one kind of chunk job.
pub struct ChunkWorkerPool {
    name: &'static str,
    pool: ThreadPool,
}

impl ChunkWorkerPool {
    pub fn new(name: &'static str, num_threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads.max(1))
            .thread_name(move |i| format!("chunk-{name}-{i}"))
            .build()?;

        Ok(ChunkWorkerPool { name, pool })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Queues `job` on the pool. Panics inside the job are caught and reported as
    /// [`WorkerError::Panicked`], so a failing job never takes a worker thread down.
    pub fn submit<K, R, F>(&self, key: K, job: F) -> ChunkJobHandle<K, R>
    where
        R: Send + 'static,
        F: FnOnce() -> JobResult<R> + Send + 'static,
    {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        let cancelled = Arc::new(AtomicBool::new(false));
        let cancelled_in_worker = cancelled.clone();

        self.pool.spawn(move || {
            // Cancelled before it got to run
            if cancelled_in_worker.load(Ordering::Acquire) {
                return;
            }

            let result = panic::catch_unwind(AssertUnwindSafe(job))
                .unwrap_or_else(|payload| Err(WorkerError::from_panic(payload)));

            // The handle may already be gone, nobody is interested in the result then
            let _ = sender.send(result);
        });

        ChunkJobHandle {
            key,
            receiver,
            cancelled,
        }
    }
}

/// The manager's side of a submitted job.
pub struct ChunkJobHandle<K, R> {
    key: K,
    receiver: Receiver<JobResult<R>>,
    cancelled: Arc<AtomicBool>,
}

impl<K, R> ChunkJobHandle<K, R> {
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Marks the job as cancelled. A job that has not started yet is skipped; the
    /// result of a running job is discarded. Calling this more than once is harmless.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Non-blocking. Returns `None` while the job is still running.
    pub fn try_result(&self) -> Option<JobResult<R>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(WorkerError::Abandoned)),
        }
    }
}

/// Outstanding jobs of a single pool.
pub struct ChunkJobTracker<K, R> {
    handles: Vec<ChunkJobHandle<K, R>>,
}

impl<K, R> Default for ChunkJobTracker<K, R> {
    fn default() -> Self {
        ChunkJobTracker {
            handles: Vec::new(),
        }
    }
}

impl<K, R> ChunkJobTracker<K, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: ChunkJobHandle<K, R>) {
        self.handles.push(handle);
    }

    /// Removes and returns the oldest finished job, if any. Cancelled jobs are dropped
    /// without looking at their results.
    pub fn poll_finished(&mut self) -> Option<(K, JobResult<R>)> {
        self.handles.retain(|handle| !handle.is_cancelled());

        for index in 0..self.handles.len() {
            if let Some(result) = self.handles[index].try_result() {
                let handle = self.handles.remove(index);
                return Some((handle.key, result));
            }
        }

        None
    }

    /// Cancels every job whose key matches and returns how many were cancelled.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&K) -> bool) -> usize {
        let before = self.handles.len();
        self.handles.retain(|handle| {
            let cancel = predicate(&handle.key);
            if cancel {
                handle.cancel();
            }
            !cancel
        });
        before - self.handles.len()
    }

    pub fn any(&self, mut predicate: impl FnMut(&K) -> bool) -> bool {
        self.handles
            .iter()
            .any(|handle| !handle.is_cancelled() && predicate(&handle.key))
    }

    pub fn clear(&mut self) -> usize {
        for handle in &self.handles {
            handle.cancel();
        }
        let cancelled = self.handles.len();
        self.handles.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
