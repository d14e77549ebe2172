use serde::{Deserialize, Serialize};

/// Summary of one completed epoch, handed to `TrainObserver::on_epoch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mini-batches processed in this epoch.
    pub batches: usize,
    pub samples: usize,
    /// Wall-clock duration of the epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Position of a just-finished mini-batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based epoch number.
    pub epoch: usize,
    /// 0-based batch index within the epoch.
    pub batch: usize,
    /// Index of the batch's first sample.
    pub offset: usize,
    pub size: usize,
}
