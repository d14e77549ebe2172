pub mod math;
pub mod activation;
pub mod error;
pub mod eval;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use activation::ActivationFunction;
pub use error::{NetworkError, Result};
pub use eval::{GradCheckMode, TestResult};
pub use layers::{FullyConnected, InputLayer, Layer, LayerGrads, Shape3d};
pub use loss::LossFunction;
pub use math::WeightInit;
pub use network::{AsTarget, LayerChain, LayerSpec, Network, NetworkSpec, Target, Workspace};
pub use optim::{Adagrad, Adam, LevenbergMarquardt, Momentum, Optimizer, ParamId, RmsProp, Sgd};
pub use train::{BatchProgress, ChannelObserver, EpochStats, TrainConfig, TrainObserver, TASK_SIZE};
