pub mod adagrad;
pub mod adam;
pub mod levenberg_marquardt;
pub mod momentum;
pub mod optimizer;
pub mod rmsprop;
pub mod sgd;

pub use adagrad::Adagrad;
pub use adam::Adam;
pub use levenberg_marquardt::LevenbergMarquardt;
pub use momentum::Momentum;
pub use optimizer::{Optimizer, ParamId, ParamKind};
pub use rmsprop::RmsProp;
pub use sgd::Sgd;
