use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{NetworkError, Result};
use crate::layers::{Layer, LayerGrads, Shape3d};
use crate::loss::LossFunction;
use crate::math::{vector, WeightInit};
use crate::network::chain::LayerChain;
use crate::network::target::AsTarget;
use crate::network::workspace::Workspace;
use crate::optim::Optimizer;

/// A feed-forward network: a layer chain trained against one loss function
/// by one optimizer.
///
/// The network owns every layer, the per-task workspaces used during
/// mini-batch training, and the Hessian-diagonal buffers used by
/// second-order optimizers.
pub struct Network<O: Optimizer> {
    name: String,
    loss: LossFunction,
    optimizer: O,
    pub(crate) layers: LayerChain,
    pub(crate) workspaces: Vec<Workspace>,
    pub(crate) hessian: Vec<LayerGrads>,
    pub(crate) rng: StdRng,
}

impl<O: Optimizer> Network<O> {
    pub fn new(name: &str, loss: LossFunction, optimizer: O) -> Network<O> {
        Network {
            name: name.to_string(),
            loss,
            optimizer,
            layers: LayerChain::new(),
            workspaces: Vec::new(),
            hessian: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Appends `layer` at the output side of the chain.
    pub fn add(&mut self, layer: impl Layer + 'static) -> Result<()> {
        self.layers.add(Box::new(layer))?;
        self.workspaces.clear();
        self.hessian.clear();
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loss(&self) -> LossFunction {
        self.loss
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    pub fn optimizer_mut(&mut self) -> &mut O {
        &mut self.optimizer
    }

    /// Merges the gradients of the first `tasks` workspaces and lets the
    /// optimizer apply them, averaged over `batch_size` samples.
    pub(crate) fn update_weights(&mut self, tasks: usize, batch_size: usize) {
        self.layers.update_weights(
            &mut self.optimizer,
            &mut self.workspaces[..tasks],
            &self.hessian,
            batch_size,
        );
    }

    pub fn layers(&self) -> &LayerChain {
        &self.layers
    }

    /// Input dimension of the network.
    pub fn in_dim(&self) -> usize {
        self.layers.in_dim()
    }

    /// Output dimension of the network.
    pub fn out_dim(&self) -> usize {
        self.layers.out_dim()
    }

    pub fn in_shape(&self) -> Shape3d {
        self.layers.in_shape()
    }

    /// Number of layers, not counting the input layer.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Layer `index`, where 0 is the first layer after the input layer.
    pub fn layer(&self, index: usize) -> Option<&dyn Layer> {
        self.layers.node(index + 1)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut (dyn Layer + 'static)> {
        self.layers.node_mut(index + 1)
    }

    /// Sets the weight initializer of every layer.
    pub fn weight_init(&mut self, init: WeightInit) -> &mut Self {
        for i in 1..self.layers.len() {
            if let Some(layer) = self.layers.node_mut(i) {
                layer.set_weight_init(init);
            }
        }
        self
    }

    /// Sets the bias initializer of every layer.
    pub fn bias_init(&mut self, init: WeightInit) -> &mut Self {
        for i in 1..self.layers.len() {
            if let Some(layer) = self.layers.node_mut(i) {
                layer.set_bias_init(init);
            }
        }
        self
    }

    /// Reseeds the generator used by weight initialization.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Refills every weight and bias with the configured initializers.
    pub fn init_weight(&mut self) {
        self.layers.init_weight(&mut self.rng);
    }

    /// Output of the network for `input`.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut ws = Workspace::forward_only(&self.layers);
        Ok(self.fprop(input, &mut ws)?.to_vec())
    }

    /// Index of the largest output, i.e. the predicted class.
    pub fn predict_label(&self, input: &[f64]) -> Result<usize> {
        self.predict(input).map(|out| vector::max_index(&out))
    }

    /// Value of the largest output.
    pub fn predict_max_value(&self, input: &[f64]) -> Result<f64> {
        self.predict(input).map(|out| vector::max_value(&out))
    }

    /// Whether both networks have the same number of parameters and every
    /// weight and bias differs by at most `eps`.
    pub fn has_same_weights<P: Optimizer>(&self, other: &Network<P>, eps: f64) -> bool {
        if self.layers.len() != other.layers.len() {
            return false;
        }
        let close = |a: &[f64], b: &[f64]| a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= eps);
        self.layers
            .nodes()
            .zip(other.layers.nodes())
            .all(|(a, b)| close(a.weight(), b.weight()) && close(a.bias(), b.bias()))
    }

    pub(crate) fn check_usable(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(NetworkError::EmptyNetwork);
        }
        Ok(())
    }

    /// Makes sure at least `count` workspaces and the Hessian buffers fit
    /// the current chain.
    pub(crate) fn ensure_workspaces(&mut self, count: usize) {
        if self.workspaces.iter().any(|ws| !ws.matches(&self.layers)) {
            self.workspaces.clear();
        }
        while self.workspaces.len() < count {
            self.workspaces.push(Workspace::for_chain(&self.layers));
        }
        if self.hessian.len() != self.layers.len() {
            self.hessian = self.layers.nodes().map(LayerGrads::for_layer).collect();
        }
    }

    /// Validates every sample before any propagation work begins.
    pub(crate) fn check_training_data<I, T>(&self, inputs: &[I], targets: &[T]) -> Result<()>
    where
        I: AsRef<[f64]>,
        T: AsTarget,
    {
        self.check_usable()?;
        if inputs.len() != targets.len() {
            return Err(NetworkError::DataMismatch { inputs: inputs.len(), targets: targets.len() });
        }
        for (i, (input, target)) in inputs.iter().zip(targets.iter()).enumerate() {
            self.check_input(input.as_ref()).map_err(|e| e.at_sample(i))?;
            target.as_target().validate(self.out_dim()).map_err(|e| e.at_sample(i))?;
        }
        Ok(())
    }

    pub(crate) fn check_input(&self, input: &[f64]) -> Result<()> {
        let head = self.layers.head();
        if input.len() != head.in_size() {
            return Err(NetworkError::InputDimensionMismatch {
                layer: format!("layer 0 ({}, {})", head.layer_type(), head.in_shape()),
                expected: head.in_size(),
                actual: input.len(),
            });
        }
        Ok(())
    }
}
