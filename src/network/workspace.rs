use crate::layers::LayerGrads;
use crate::network::chain::LayerChain;

/// Per-task propagation state: every node's cached output plus its
/// weight/bias gradient accumulator.
///
/// A workspace is owned by exactly one task while samples propagate, so
/// concurrent tasks never write the same accumulator. The coordinator merges
/// workspaces after the tasks have joined.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub(crate) outputs: Vec<Vec<f64>>,
    pub(crate) grads: Vec<LayerGrads>,
}

impl Workspace {
    /// Buffers for forward and backward propagation through `chain`.
    pub fn for_chain(chain: &LayerChain) -> Workspace {
        Workspace {
            outputs: chain.nodes().map(|l| vec![0.0; l.out_size()]).collect(),
            grads: chain.nodes().map(LayerGrads::for_layer).collect(),
        }
    }

    /// Output buffers only; enough for prediction.
    pub fn forward_only(chain: &LayerChain) -> Workspace {
        Workspace {
            outputs: chain.nodes().map(|l| vec![0.0; l.out_size()]).collect(),
            grads: Vec::new(),
        }
    }

    /// Whether the output buffers fit `chain`.
    pub fn fits_outputs(&self, chain: &LayerChain) -> bool {
        self.outputs.len() == chain.len()
            && chain.nodes().zip(self.outputs.iter()).all(|(l, out)| out.len() == l.out_size())
    }

    /// Whether the buffers still fit `chain` (layers may have been added).
    pub fn matches(&self, chain: &LayerChain) -> bool {
        self.outputs.len() == chain.len()
            && self.grads.len() == chain.len()
            && chain
                .nodes()
                .zip(self.outputs.iter().zip(self.grads.iter()))
                .all(|(l, (out, g))| {
                    out.len() == l.out_size() && g.dw.len() == l.weight().len() && g.db.len() == l.bias().len()
                })
    }

    /// Accumulated gradient of node `index`.
    pub fn grads(&self, index: usize) -> &LayerGrads {
        &self.grads[index]
    }

    /// Cached output of node `index` from the last forward pass.
    pub fn output(&self, index: usize) -> &[f64] {
        &self.outputs[index]
    }

    pub fn clear_grads(&mut self) {
        self.grads.iter_mut().for_each(LayerGrads::clear);
    }
}
