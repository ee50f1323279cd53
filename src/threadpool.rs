//! A fixed worker pool with a bounded task queue.
//!
//! Search tasks are independent and cancellation-aware, so the pool
//! can stay simple: N detached workers block on a condition variable
//! and drain a FIFO queue. The queue is bounded; enqueueing onto a
//! full queue — or onto a pool with no workers at all — runs the task
//! inline on the calling thread instead of blocking. The zero-worker
//! *inline* pool doubles as the deterministic single-threaded mode.
//!
//! Teardown follows the queue itself: dropping the pool feeds stop
//! sentinels through the queue until every worker has exited. Workers
//! never hold the queue lock while running a task.

use crate::constants::{NPROC_ENV_VAR, TASK_QUEUE_CAPACITY};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::{env, thread};

/// A queued unit of work. Returning `false` asks the executing worker
/// to shut down; ordinary tasks return `true`.
type Task = Box<dyn FnOnce() -> bool + Send + 'static>;

struct Shared {
    queue: Mutex<VecDeque<Task>>,
    task_available: Condvar,
    worker_count: AtomicUsize,
}

/// The pool handle. Dropping it stops and detaches from all workers.
pub struct ThreadPool {
    shared: Arc<Shared>,
}

/// Worker count from the environment override or the machine,
/// never less than one.
fn detect_worker_count() -> usize {
    if let Ok(value) = env::var(NPROC_ENV_VAR) {
        return value.trim().parse::<usize>().unwrap_or(0).max(1);
    }
    thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1)
}

impl ThreadPool {
    /// A pool sized for this machine (see [`NPROC_ENV_VAR`]).
    pub fn new() -> ThreadPool {
        ThreadPool::with_workers(detect_worker_count())
    }

    /// A pool executing every task inline on the caller. Searches
    /// become synchronous and, with a seeded RNG, deterministic.
    pub fn inline() -> ThreadPool {
        ThreadPool::with_workers(0)
    }

    /// A pool with exactly `workers` threads; 0 means inline mode.
    pub fn with_workers(workers: usize) -> ThreadPool {
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::with_capacity(TASK_QUEUE_CAPACITY)),
            task_available: Condvar::new(),
            worker_count: AtomicUsize::new(workers),
        });

        tracing::info!(
            workers,
            "starting search workers (override with {NPROC_ENV_VAR})"
        );

        for index in 0..workers {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name(format!("search-worker-{index}"))
                .spawn(move || worker_loop(&shared))
                .expect("failed to spawn search worker");
        }

        ThreadPool { shared }
    }

    /// Current number of live workers.
    pub fn workers(&self) -> usize {
        self.shared.worker_count.load(Ordering::SeqCst)
    }

    /// Submits `task` for execution. Runs it inline when the pool has
    /// no workers or the queue is full; the caller never blocks on
    /// queue space.
    pub fn enqueue(&self, task: impl FnOnce() + Send + 'static) {
        let task: Task = Box::new(move || {
            task();
            true
        });

        if self.workers() == 0 {
            task();
            return;
        }

        match self.try_enqueue(task) {
            Ok(()) => {
                self.shared.task_available.notify_one();
            }
            Err(task) => {
                task();
            }
        }
    }

    /// Queues `task`, handing it back if the queue is full.
    fn try_enqueue(&self, task: Task) -> Result<(), Task> {
        let mut queue = self.shared.queue.lock();
        if queue.len() >= TASK_QUEUE_CAPACITY {
            return Err(task);
        }
        queue.push_back(task);
        Ok(())
    }
}

impl Default for ThreadPool {
    fn default() -> ThreadPool {
        ThreadPool::new()
    }
}

impl Drop for ThreadPool {
    /// Feeds stop sentinels until every worker has exited. Queued
    /// search tasks still drain first; they abort quickly once their
    /// time budget has lapsed.
    fn drop(&mut self) {
        while self.workers() > 0 {
            let _ = self.try_enqueue(Box::new(|| false));
            self.shared.task_available.notify_one();
            thread::yield_now();
        }
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let task = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(task) = queue.pop_front() {
                    break task;
                }
                shared.task_available.wait(&mut queue);
            }
        };

        if !task() {
            break;
        }
    }

    shared.worker_count.fetch_sub(1, Ordering::SeqCst);
}
