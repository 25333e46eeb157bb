//! Fixed-size worker pool for post-processing
//!
//! Tasks travel to the workers over a bounded channel and outcomes come back
//! over an unbounded one. Each task owns everything it touches, so workers
//! never share mutable state and need no locks. A full queue blocks the
//! submitter, which bounds how much finished inference can pile up in memory.

use super::task::Task;
use super::{ItemFailure, RunReport};
use crate::error::{EnhanceError, EnhanceResult};
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use log::{debug, error, warn};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

/// Queue slots per worker
const QUEUE_DEPTH_PER_WORKER: usize = 2;

struct Outcome {
    label: String,
    result: EnhanceResult<Vec<PathBuf>>,
}

/// Bounded pool of post-processing threads
pub struct WorkerPool<T: Task> {
    queue: Option<Sender<T>>,
    outcomes: Receiver<Outcome>,
    workers: Vec<JoinHandle<()>>,
    submitted: usize,
}

impl<T: Task> WorkerPool<T> {
    /// Spawn `num_workers` threads
    pub fn new(num_workers: usize) -> EnhanceResult<Self> {
        if num_workers == 0 {
            return Err(EnhanceError::ConfigError(
                "worker pool needs at least one worker".to_string(),
            ));
        }

        let (task_tx, task_rx) = bounded::<T>(num_workers * QUEUE_DEPTH_PER_WORKER);
        let (outcome_tx, outcome_rx) = unbounded::<Outcome>();

        let mut workers = Vec::with_capacity(num_workers);
        for id in 0..num_workers {
            let tasks = task_rx.clone();
            let outcomes = outcome_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("postproc-{}", id))
                .spawn(move || worker_loop(tasks, outcomes))
                .map_err(|e| EnhanceError::WorkerPool(format!("cannot spawn worker: {}", e)))?;
            workers.push(handle);
        }
        debug!("Started {} post-processing workers", num_workers);

        Ok(WorkerPool {
            queue: Some(task_tx),
            outcomes: outcome_rx,
            workers,
            submitted: 0,
        })
    }

    /// Number of worker threads
    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Queue a task, blocking while the queue is full
    pub fn submit(&mut self, task: T) -> EnhanceResult<()> {
        let queue = self
            .queue
            .as_ref()
            .ok_or_else(|| EnhanceError::WorkerPool("pool already finished".to_string()))?;
        queue
            .send(task)
            .map_err(|_| EnhanceError::WorkerPool("all workers have exited".to_string()))?;
        self.submitted += 1;
        Ok(())
    }

    /// Close the queue, wait for every queued task and report per-item outcomes
    pub fn finish(mut self) -> RunReport {
        self.shutdown();

        let mut report = RunReport::default();
        for outcome in self.outcomes.try_iter() {
            report.record(outcome.label, outcome.result);
        }

        let received = report.written_items + report.failures.len();
        if received < self.submitted {
            report.failures.push(ItemFailure {
                item: format!("{} unreported task(s)", self.submitted - received),
                error: EnhanceError::WorkerPool("worker exited before reporting".to_string()),
            });
        }
        report
    }

    fn shutdown(&mut self) {
        // dropping the sender lets workers drain the queue and exit
        self.queue.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("post-processing worker terminated abnormally");
            }
        }
    }
}

impl<T: Task> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop<T: Task>(tasks: Receiver<T>, outcomes: Sender<Outcome>) {
    for task in tasks.iter() {
        let label = task.label();
        let result = catch_unwind(AssertUnwindSafe(|| task.run())).unwrap_or_else(|_| {
            Err(EnhanceError::WorkerPool(format!("task for {} panicked", label)))
        });

        if let Err(ref e) = result {
            warn!("{}: {}", label, e);
        }
        if outcomes.send(Outcome { label, result }).is_err() {
            break;
        }
    }
}
