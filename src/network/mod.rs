pub mod chain;
pub mod network;
pub mod persist;
pub mod propagation;
pub mod spec;
pub mod target;
pub mod workspace;

pub use chain::LayerChain;
pub use network::Network;
pub use propagation::{canonical_delta, chain_rule_delta, is_canonical_link};
pub use spec::{LayerSpec, NetworkSpec};
pub use target::{AsTarget, Target};
pub use workspace::Workspace;
