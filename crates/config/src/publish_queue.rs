// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! A single-threaded serialized executor draining ConfigTree notifications.
//!
//! This is the only source of serialization between configuration updates
//! and state-machine transitions: mutations and notifications happen on
//! this thread, while long-running lifecycle phases run on a separate
//! worker pool.

use parking_lot::{Condvar, Mutex};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

type Task = Box<dyn FnOnce() + Send + 'static>;

enum Job {
    Run(Task),
    RunAndSignal(Task, Arc<(Mutex<bool>, Condvar)>),
    Shutdown,
}

/// FIFO single-threaded task queue. Cloning shares the same worker thread.
#[derive(Clone)]
pub struct PublishQueue {
    sender: Sender<Job>,
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl PublishQueue {
    /// Spawn the publish thread.
    #[allow(clippy::expect_used)]
    pub fn start() -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let handle = std::thread::Builder::new()
            .name("publish-queue".into())
            .spawn(move || {
                for job in receiver {
                    match job {
                        Job::Run(task) => run_task(task),
                        Job::RunAndSignal(task, signal) => {
                            run_task(task);
                            let (lock, cvar) = &*signal;
                            *lock.lock() = true;
                            cvar.notify_all();
                        }
                        Job::Shutdown => break,
                    }
                }
            })
            .expect("failed to spawn publish-queue thread");

        Self { sender, handle: Arc::new(Mutex::new(Some(handle))) }
    }

    /// Enqueue a task without waiting for it to run.
    pub fn submit(&self, task: impl FnOnce() + Send + 'static) {
        // Ignore send errors: the queue may already be shutting down, in
        // which case late notifications are dropped rather than panicking
        // the caller (mirrors a best-effort shutdown).
        let _ = self.sender.send(Job::Run(Box::new(task)));
    }

    /// Block the caller until the queue has drained past this submission
    /// point. Used by test harnesses and by orderly shutdown to ensure "all
    /// pending notifications have been observed.
    pub fn run_and_wait(&self, task: impl FnOnce() + Send + 'static) {
        let signal = Arc::new((Mutex::new(false), Condvar::new()));
        if self.sender.send(Job::RunAndSignal(Box::new(task), signal.clone())).is_err() {
            return;
        }
        let (lock, cvar) = &*signal;
        let mut done = lock.lock();
        while !*done {
            cvar.wait(&mut done);
        }
    }

    /// Block until every task submitted before this call has drained,
    /// without running any new task.
    pub fn drain(&self) {
        self.run_and_wait(|| {});
    }

    /// Stop the worker thread after draining pending tasks. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.sender.send(Job::Shutdown);
        if let Some(handle) = self.handle.lock().take() {
            let _ = handle.join();
        }
    }
}

fn run_task(task: Task) {
    // "Exceptions in a subscriber are logged and discarded; they do not
    // abort other subscribers or the queue.
    if let Err(panic) = catch_unwind(AssertUnwindSafe(task)) {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        tracing::error!(error = %message, "publish queue task panicked");
    }
}

#[cfg(test)]
#[path = "publish_queue_tests.rs"]
mod tests;
