use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::activation::ActivationFunction;
use crate::math::{vector, WeightInit};

/// Width × height × channel count of a layer's input or output.
///
/// Propagation treats every shape as a flat vector of `size()` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Shape3d {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

impl Shape3d {
    pub fn new(width: usize, height: usize, depth: usize) -> Shape3d {
        Shape3d { width, height, depth }
    }

    /// A flat vector of `n` values.
    pub fn flat(n: usize) -> Shape3d {
        Shape3d::new(n, 1, 1)
    }

    pub fn size(&self) -> usize {
        self.width * self.height * self.depth
    }
}

impl fmt::Display for Shape3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}

/// Gradient (or Hessian-diagonal) accumulator matching one layer's
/// weight and bias vectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerGrads {
    pub dw: Vec<f64>,
    pub db: Vec<f64>,
}

impl LayerGrads {
    pub fn zeros(weights: usize, biases: usize) -> LayerGrads {
        LayerGrads { dw: vec![0.0; weights], db: vec![0.0; biases] }
    }

    pub fn for_layer(layer: &dyn Layer) -> LayerGrads {
        LayerGrads::zeros(layer.weight().len(), layer.bias().len())
    }

    pub fn clear(&mut self) {
        self.dw.iter_mut().for_each(|x| *x = 0.0);
        self.db.iter_mut().for_each(|x| *x = 0.0);
    }

    /// `self += other`
    pub fn merge(&mut self, other: &LayerGrads) {
        vector::add_assign(&mut self.dw, &other.dw);
        vector::add_assign(&mut self.db, &other.db);
    }

    pub fn divide(&mut self, denominator: f64) {
        vector::scale(&mut self.dw, 1.0 / denominator);
        vector::scale(&mut self.db, 1.0 / denominator);
    }
}

/// A node of the layer chain.
///
/// Forward and backward primitives take `&self`: parameters are read-only
/// while samples propagate, and all per-sample state (outputs, gradient
/// accumulators) lives in caller-owned buffers. That lets several tasks
/// propagate through the same chain at once, each with its own buffers.
/// Weights change only through `weight_mut` / `bias_mut`.
pub trait Layer: Send + Sync + fmt::Debug {
    /// Short human-readable kind, used in error messages.
    fn layer_type(&self) -> &'static str;

    fn in_shape(&self) -> Shape3d;

    fn out_shape(&self) -> Shape3d;

    fn in_size(&self) -> usize {
        self.in_shape().size()
    }

    fn out_size(&self) -> usize {
        self.out_shape().size()
    }

    /// Activation applied to this layer's output.
    fn activation(&self) -> ActivationFunction;

    fn weight(&self) -> &[f64];

    fn bias(&self) -> &[f64];

    fn weight_mut(&mut self) -> &mut [f64];

    fn bias_mut(&mut self) -> &mut [f64];

    /// Incoming connections per output unit.
    fn fan_in(&self) -> usize {
        self.in_size()
    }

    /// Outgoing connections per input unit.
    fn fan_out(&self) -> usize {
        self.out_size()
    }

    /// Called on the current tail when a layer taking `next_in_shape` is
    /// appended after it. Shape-less layers adopt that shape here.
    fn connect(&mut self, _next_in_shape: Shape3d) {}

    fn set_weight_init(&mut self, _init: WeightInit) {}

    fn set_bias_init(&mut self, _init: WeightInit) {}

    /// Refills weights and biases with the layer's configured initializers.
    fn init_weight(&mut self, _rng: &mut dyn RngCore) {}

    /// Enables intra-layer data parallelism for the forward/backward loops.
    fn set_parallelize(&mut self, _parallelize: bool) {}

    /// Writes this layer's activated output for `input` into `output`.
    fn forward(&self, input: &[f64], output: &mut [f64]);

    /// Consumes `curr_delta` (dE/da for this layer's units), accumulates the
    /// weight/bias gradient into `grads`, and writes dE/da of the previous
    /// layer into `prev_delta`, using the previous layer's cached output and
    /// activation.
    fn backward(
        &self,
        prev_out: &[f64],
        prev_activation: ActivationFunction,
        curr_delta: &[f64],
        grads: &mut LayerGrads,
        prev_delta: &mut [f64],
    );

    /// Second-order counterpart of `backward`: propagates the diagonal
    /// curvature estimate and accumulates it into `hessian`.
    fn backward_2nd(
        &self,
        prev_out: &[f64],
        prev_activation: ActivationFunction,
        curr_delta2: &[f64],
        hessian: &mut LayerGrads,
        prev_delta2: &mut [f64],
    );
}
