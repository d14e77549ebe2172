pub mod dense;
pub mod input;
pub mod layer;

pub use dense::FullyConnected;
pub use input::InputLayer;
pub use layer::{Layer, LayerGrads, Shape3d};
