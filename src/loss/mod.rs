pub mod cross_entropy;
pub mod cross_entropy_multiclass;
pub mod huber;
pub mod loss_type;
pub mod mae;
pub mod mse;

pub use cross_entropy::CrossEntropyLoss;
pub use cross_entropy_multiclass::CrossEntropyMulticlassLoss;
pub use huber::HuberLoss;
pub use loss_type::LossFunction;
pub use mae::MaeLoss;
pub use mse::MseLoss;
