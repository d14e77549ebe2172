use std::sync::mpsc;

use crate::network::Network;
use crate::optim::Optimizer;
use crate::train::epoch_stats::{BatchProgress, EpochStats};

/// Hooks called by `train` on the orchestrating thread, after each
/// mini-batch and after each epoch. Both default to doing nothing.
pub trait TrainObserver<O: Optimizer> {
    fn on_batch(&mut self, _net: &Network<O>, _progress: &BatchProgress) {}

    fn on_epoch(&mut self, _net: &Network<O>, _stats: &EpochStats) {}
}

/// No-op observer.
impl<O: Optimizer> TrainObserver<O> for () {}

/// Forwards every `EpochStats` over a channel, e.g. to a progress display
/// running on another thread. A dropped receiver is ignored.
pub struct ChannelObserver {
    tx: mpsc::Sender<EpochStats>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::Sender<EpochStats>) -> Self {
        ChannelObserver { tx }
    }
}

impl<O: Optimizer> TrainObserver<O> for ChannelObserver {
    fn on_epoch(&mut self, _net: &Network<O>, stats: &EpochStats) {
        let _ = self.tx.send(stats.clone());
    }
}
