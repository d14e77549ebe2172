use rand::RngCore;

use crate::error::{NetworkError, Result};
use crate::layers::{InputLayer, Layer, LayerGrads, Shape3d};
use crate::math::vector;
use crate::network::workspace::Workspace;
use crate::optim::{Optimizer, ParamId};

/// Ordered arena of layer nodes. Node 0 is always an `InputLayer`; node
/// `i - 1` feeds node `i`, so traversal is plain index arithmetic.
#[derive(Debug)]
pub struct LayerChain {
    nodes: Vec<Box<dyn Layer>>,
}

impl Default for LayerChain {
    fn default() -> Self {
        LayerChain::new()
    }
}

impl LayerChain {
    pub fn new() -> LayerChain {
        LayerChain { nodes: vec![Box::new(InputLayer::new())] }
    }

    /// Appends a node at the output side.
    ///
    /// The first real layer defines the network's input shape; every later
    /// layer must take exactly as many values as the current tail produces.
    pub fn add(&mut self, layer: Box<dyn Layer>) -> Result<()> {
        if self.nodes.len() > 1 {
            let tail = self.tail();
            if tail.out_size() != layer.in_size() {
                return Err(NetworkError::ConnectionMismatch {
                    layer: format!("layer {} ({})", self.nodes.len(), layer.layer_type()),
                    expected: tail.out_size(),
                    actual: layer.in_size(),
                });
            }
        }
        let in_shape = layer.in_shape();
        self.tail_mut().connect(in_shape);
        self.nodes.push(layer);
        Ok(())
    }

    /// Number of nodes, input layer included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no layer has been added past the input layer.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn head(&self) -> &dyn Layer {
        self.nodes[0].as_ref()
    }

    pub fn tail(&self) -> &dyn Layer {
        self.nodes[self.nodes.len() - 1].as_ref()
    }

    fn tail_mut(&mut self) -> &mut dyn Layer {
        let last = self.nodes.len() - 1;
        self.nodes[last].as_mut()
    }

    pub fn node(&self, index: usize) -> Option<&dyn Layer> {
        self.nodes.get(index).map(|l| l.as_ref())
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut (dyn Layer + 'static)> {
        self.nodes.get_mut(index).map(|l| l.as_mut())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &dyn Layer> + '_ {
        self.nodes.iter().map(|l| l.as_ref())
    }

    pub fn in_dim(&self) -> usize {
        self.head().in_size()
    }

    pub fn out_dim(&self) -> usize {
        self.tail().out_size()
    }

    pub fn in_shape(&self) -> Shape3d {
        self.head().in_shape()
    }

    pub fn init_weight(&mut self, rng: &mut dyn RngCore) {
        for node in self.nodes.iter_mut() {
            node.init_weight(rng);
        }
    }

    pub fn set_parallelize(&mut self, parallelize: bool) {
        for node in self.nodes.iter_mut() {
            node.set_parallelize(parallelize);
        }
    }

    /// Runs every node in order, caching outputs in `ws`, and returns the
    /// tail output. `input` must already match the head's input size.
    pub fn forward<'w>(&self, input: &[f64], ws: &'w mut Workspace) -> &'w [f64] {
        self.nodes[0].forward(input, &mut ws.outputs[0]);
        for i in 1..self.nodes.len() {
            let (done, rest) = ws.outputs.split_at_mut(i);
            self.nodes[i].forward(&done[i - 1], &mut rest[0]);
        }
        &ws.outputs[self.nodes.len() - 1]
    }

    /// Hands `delta` (dE/da of the tail) to the tail and walks it back to
    /// the head, accumulating each node's gradient into `ws`.
    pub fn backward(&self, delta: Vec<f64>, ws: &mut Workspace) {
        let mut delta = delta;
        for i in (1..self.nodes.len()).rev() {
            let prev = &self.nodes[i - 1];
            let mut prev_delta = vec![0.0; prev.out_size()];
            self.nodes[i].backward(
                &ws.outputs[i - 1],
                prev.activation(),
                &delta,
                &mut ws.grads[i],
                &mut prev_delta,
            );
            delta = prev_delta;
        }
    }

    /// Second-order counterpart of `backward`, accumulating into `hessian`
    /// from the outputs cached by the last forward pass through `ws`.
    pub fn backward_2nd(&self, delta2: Vec<f64>, ws: &Workspace, hessian: &mut [LayerGrads]) {
        let mut delta2 = delta2;
        for i in (1..self.nodes.len()).rev() {
            let prev = &self.nodes[i - 1];
            let mut prev_delta2 = vec![0.0; prev.out_size()];
            self.nodes[i].backward_2nd(
                &ws.outputs[i - 1],
                prev.activation(),
                &delta2,
                &mut hessian[i],
                &mut prev_delta2,
            );
            delta2 = prev_delta2;
        }
    }

    /// Merges the gradients of every workspace into the first one, averages
    /// them over `batch_size` samples, lets `optimizer` update every weight
    /// and bias vector once, then clears all the workspaces.
    ///
    /// Summation runs workspace by workspace, so the merged gradient can
    /// differ in the last bits between runs with different task counts.
    pub fn update_weights<O: Optimizer + ?Sized>(
        &mut self,
        optimizer: &mut O,
        workspaces: &mut [Workspace],
        hessian: &[LayerGrads],
        batch_size: usize,
    ) {
        let Some((merged, rest)) = workspaces.split_first_mut() else {
            return;
        };

        for (index, node) in self.nodes.iter_mut().enumerate() {
            if node.weight().is_empty() && node.bias().is_empty() {
                continue;
            }
            let grads = &mut merged.grads[index];
            for other in rest.iter() {
                grads.merge(&other.grads[index]);
            }
            grads.divide(batch_size as f64);

            optimizer.update(ParamId::weight(index), &grads.dw, &hessian[index].dw, node.weight_mut());
            optimizer.update(ParamId::bias(index), &grads.db, &hessian[index].db, node.bias_mut());
        }

        for ws in workspaces.iter_mut() {
            ws.clear_grads();
        }
    }

    pub fn is_any_weight_non_finite(&self) -> bool {
        self.nodes
            .iter()
            .any(|l| vector::has_non_finite(l.weight()) || vector::has_non_finite(l.bias()))
    }
}
