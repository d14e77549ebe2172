use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::activation::ActivationFunction;
use crate::error::Result;
use crate::layers::FullyConnected;
use crate::loss::LossFunction;
use crate::network::network::Network;
use crate::optim::Optimizer;

/// Describes one fully-connected layer of a network specification.
///
/// - `size`: number of neurons in this layer
/// - `input_size`: number of values feeding into it (the previous layer's
///   size, or the network input dimension for the first layer)
/// - `activation`: activation applied after the affine map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationFunction,
}

/// A serializable description of a network architecture and its loss.
///
/// The spec is stored separately from trained weights (see `Network::save`),
/// so an architecture can be written down before training starts and the
/// weights loaded into a network built from it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    /// Ordered layer descriptions, input side first.
    pub layers: Vec<LayerSpec>,
    pub loss: LossFunction,
}

impl NetworkSpec {
    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Builds an untrained network with this architecture. Fails with
    /// `ConnectionMismatch` when consecutive layer sizes disagree.
    pub fn build<O: Optimizer>(&self, optimizer: O) -> Result<Network<O>> {
        let mut net = Network::new(&self.name, self.loss, optimizer);
        for layer in &self.layers {
            net.add(FullyConnected::new(layer.size, layer.input_size, layer.activation))?;
        }
        Ok(net)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use crate::optim::Sgd;

    #[test]
    fn parses_and_builds() {
        let json = r#"{
            "name": "xor",
            "layers": [
                { "size": 3, "input_size": 2, "activation": "tanh" },
                { "size": 1, "input_size": 3, "activation": "sigmoid" }
            ],
            "loss": "cross_entropy"
        }"#;
        let spec: NetworkSpec = serde_json::from_str(json).unwrap();
        let net = spec.build(Sgd::default()).unwrap();
        assert_eq!(net.name(), "xor");
        assert_eq!((net.in_dim(), net.out_dim()), (2, 1));
        assert_eq!(net.loss(), LossFunction::CrossEntropy);
    }

    #[test]
    fn build_rejects_disconnected_layers() {
        let spec = NetworkSpec {
            name: "broken".into(),
            layers: vec![
                LayerSpec { size: 3, input_size: 2, activation: ActivationFunction::Tanh },
                LayerSpec { size: 1, input_size: 4, activation: ActivationFunction::Identity },
            ],
            loss: LossFunction::Mse,
        };
        assert!(matches!(spec.build(Sgd::default()), Err(NetworkError::ConnectionMismatch { .. })));
    }
}
