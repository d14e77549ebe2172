pub mod epoch_stats;
pub mod loop_fn;
pub mod observer;
pub mod train_config;

pub use epoch_stats::{BatchProgress, EpochStats};
pub use observer::{ChannelObserver, TrainObserver};
pub use train_config::{TrainConfig, TASK_SIZE};
