//! Post-processing: reconstruction tasks, output paths and the worker pool

/// Destination paths
pub mod paths;
/// Worker pool
pub mod pool;
/// Post-processing tasks
pub mod task;

pub use paths::{OutputKind, OutputPathPlan, ensure_parent};
pub use pool::WorkerPool;
pub use task::{PostProcess, ReconstructTask, Task, ValidationTask};

use crate::error::{EnhanceError, EnhanceResult};
use std::path::PathBuf;

/// One item that could not be produced
#[derive(Debug)]
pub struct ItemFailure {
    /// Item name (input path or index)
    pub item: String,
    /// Why it failed
    pub error: EnhanceError,
}

/// Outcome of a run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Items completed successfully
    pub written_items: usize,
    /// Every file written
    pub written: Vec<PathBuf>,
    /// Items that failed, in the order their failures were observed
    pub failures: Vec<ItemFailure>,
}

impl RunReport {
    /// Record one item's outcome
    pub fn record(&mut self, item: String, result: EnhanceResult<Vec<PathBuf>>) {
        match result {
            Ok(paths) => {
                self.written_items += 1;
                self.written.extend(paths);
            }
            Err(error) => self.failures.push(ItemFailure { item, error }),
        }
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: RunReport) {
        self.written_items += other.written_items;
        self.written.extend(other.written);
        self.failures.extend(other.failures);
    }

    /// True when no item failed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
