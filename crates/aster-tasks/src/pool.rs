// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The worker pool itself.

use crate::{PoolError, TaskError, TaskHandle};
use aster_core::task::{Job, TaskExecutor};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

/// State shared between the pool and its workers.
struct Shared {
    stopping: AtomicBool,
    /// Jobs queued or running. Guarded so `wait_for_all` can sleep on it.
    outstanding: Mutex<usize>,
    idle: Condvar,
    queued: AtomicUsize,
    active: AtomicUsize,
}

impl Shared {
    fn task_done(&self) {
        let mut outstanding = self.outstanding.lock();
        *outstanding = outstanding.saturating_sub(1);
        if *outstanding == 0 {
            self.idle.notify_all();
        }
    }
}

/// A fixed set of worker threads draining a single FIFO job queue.
///
/// Jobs start in submission order (completion order depends on the jobs).
/// A panicking job is caught and logged; the worker keeps running. Dropping
/// the pool stops accepting work, discards jobs that have not started yet and
/// joins every worker.
pub struct WorkerPool {
    shared: Arc<Shared>,
    sender: Mutex<Option<Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    thread_ids: Vec<ThreadId>,
}

impl WorkerPool {
    /// Starts a pool with `threads` workers. Zero means one worker per
    /// available hardware thread.
    pub fn new(threads: usize) -> Result<Self, PoolError> {
        Self::with_thread_name("aster-worker", threads)
    }

    /// Starts a pool whose threads are named `{prefix}-{index}`.
    pub fn with_thread_name(prefix: &str, threads: usize) -> Result<Self, PoolError> {
        let size = if threads == 0 {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        } else {
            threads
        };

        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();
        let shared = Arc::new(Shared {
            stopping: AtomicBool::new(false),
            outstanding: Mutex::new(0),
            idle: Condvar::new(),
            queued: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
        });

        let mut workers = Vec::with_capacity(size);
        for index in 0..size {
            let receiver = receiver.clone();
            let worker_shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("{prefix}-{index}"))
                .spawn(move || worker_loop(receiver, worker_shared));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(source) => {
                    shared.stopping.store(true, Ordering::SeqCst);
                    drop(sender);
                    for worker in workers {
                        let _ = worker.join();
                    }
                    return Err(PoolError::Spawn { index, source });
                }
            }
        }

        let thread_ids = workers.iter().map(|w| w.thread().id()).collect();
        log::info!("Worker pool '{prefix}' started with {size} threads.");

        Ok(Self {
            shared,
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
            thread_ids,
        })
    }

    /// Queues a closure and returns a handle to its eventual result.
    ///
    /// If the closure panics the panic is logged and the handle resolves to
    /// [`TaskError::Panicked`]. If the pool shuts down before the closure
    /// starts, the handle resolves to [`TaskError::Cancelled`].
    pub fn submit<F, R>(&self, task: F) -> TaskHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        self.spawn(Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(task)).map_err(|payload| {
                let message = panic_message(payload.as_ref());
                log::error!("Task panicked on '{}': {message}", current_thread_name());
                TaskError::Panicked(message)
            });
            // The caller may have dropped its handle.
            let _ = sender.send(outcome);
        }));
        TaskHandle::new(receiver)
    }

    /// Queues a job without a result channel.
    pub fn spawn(&self, job: Job) {
        // Cloned so the lock is released before the job could be dropped:
        // dropping a job may run code that submits again.
        let sender = self.sender.lock().clone();
        let Some(sender) = sender else {
            log::warn!("Job submitted to a worker pool that has shut down; dropping it.");
            drop(job);
            return;
        };

        *self.shared.outstanding.lock() += 1;
        self.shared.queued.fetch_add(1, Ordering::AcqRel);

        if let Err(rejected) = sender.send(job) {
            self.shared.queued.fetch_sub(1, Ordering::AcqRel);
            self.shared.task_done();
            log::warn!("Worker pool queue is closed; dropping job.");
            drop(rejected);
        }
    }

    /// Blocks until the queue is empty and no job is running.
    ///
    /// Calling this from a worker of the same pool would wait on itself; the
    /// call is refused with an error log instead.
    pub fn wait_for_all(&self) {
        if self.is_worker_thread() {
            log::error!("wait_for_all() called from a worker of the same pool; ignoring.");
            return;
        }
        let mut outstanding = self.shared.outstanding.lock();
        while *outstanding > 0 {
            self.shared.idle.wait(&mut outstanding);
        }
    }

    /// Stops accepting work, discards queued jobs and joins the workers.
    /// Jobs already running are allowed to finish. Idempotent.
    pub fn shutdown(&self) {
        if self.shared.stopping.swap(true, Ordering::SeqCst) {
            return;
        }
        drop(self.sender.lock().take());

        let current = thread::current().id();
        let workers = std::mem::take(&mut *self.workers.lock());
        for worker in workers {
            if worker.thread().id() == current {
                continue;
            }
            let name = worker.thread().name().unwrap_or("worker").to_owned();
            if worker.join().is_err() {
                log::error!("Worker thread '{name}' terminated abnormally.");
            }
        }

        // Discarded jobs never reported completion.
        self.shared.queued.store(0, Ordering::Release);
        *self.shared.outstanding.lock() = 0;
        self.shared.idle.notify_all();
        log::debug!("Worker pool shut down.");
    }

    /// Number of worker threads.
    #[must_use]
    pub fn size(&self) -> usize {
        self.thread_ids.len()
    }

    /// Jobs waiting for a worker.
    #[must_use]
    pub fn queued_tasks(&self) -> usize {
        self.shared.queued.load(Ordering::Acquire)
    }

    /// Jobs currently running.
    #[must_use]
    pub fn active_tasks(&self) -> usize {
        self.shared.active.load(Ordering::Acquire)
    }

    /// Ids of the worker threads, in spawn order.
    #[must_use]
    pub fn thread_ids(&self) -> &[ThreadId] {
        &self.thread_ids
    }

    /// Returns `true` when called from one of this pool's workers.
    #[must_use]
    pub fn is_worker_thread(&self) -> bool {
        self.thread_ids.contains(&thread::current().id())
    }
}

impl TaskExecutor for WorkerPool {
    fn execute(&self, job: Job) {
        self.spawn(job);
    }

    fn wait_idle(&self) {
        self.wait_for_all();
    }

    fn is_worker_thread(&self) -> bool {
        WorkerPool::is_worker_thread(self)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(receiver: Receiver<Job>, shared: Arc<Shared>) {
    while let Ok(job) = receiver.recv() {
        if shared.stopping.load(Ordering::Acquire) {
            drop(job);
            break;
        }

        shared.queued.fetch_sub(1, Ordering::AcqRel);
        shared.active.fetch_add(1, Ordering::AcqRel);

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            log::error!(
                "Job panicked on '{}': {}",
                current_thread_name(),
                panic_message(payload.as_ref())
            );
        }

        shared.active.fetch_sub(1, Ordering::AcqRel);
        shared.task_done();
    }
}

fn current_thread_name() -> String {
    thread::current().name().unwrap_or("unnamed").to_owned()
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
