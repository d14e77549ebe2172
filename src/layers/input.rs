use crate::activation::ActivationFunction;
use crate::layers::layer::{Layer, LayerGrads, Shape3d};

/// Head of every layer chain. Passes its input through unchanged and takes
/// its shape from the first real layer appended after it.
#[derive(Debug, Default)]
pub struct InputLayer {
    shape: Shape3d,
}

impl InputLayer {
    pub fn new() -> InputLayer {
        InputLayer::default()
    }
}

impl Layer for InputLayer {
    fn layer_type(&self) -> &'static str {
        "input"
    }

    fn in_shape(&self) -> Shape3d {
        self.shape
    }

    fn out_shape(&self) -> Shape3d {
        self.shape
    }

    fn activation(&self) -> ActivationFunction {
        ActivationFunction::Identity
    }

    fn weight(&self) -> &[f64] {
        &[]
    }

    fn bias(&self) -> &[f64] {
        &[]
    }

    fn weight_mut(&mut self) -> &mut [f64] {
        &mut []
    }

    fn bias_mut(&mut self) -> &mut [f64] {
        &mut []
    }

    fn connect(&mut self, next_in_shape: Shape3d) {
        self.shape = next_in_shape;
    }

    fn forward(&self, input: &[f64], output: &mut [f64]) {
        output.copy_from_slice(input);
    }

    fn backward(
        &self,
        _prev_out: &[f64],
        _prev_activation: ActivationFunction,
        _curr_delta: &[f64],
        _grads: &mut LayerGrads,
        _prev_delta: &mut [f64],
    ) {
    }

    fn backward_2nd(
        &self,
        _prev_out: &[f64],
        _prev_activation: ActivationFunction,
        _curr_delta2: &[f64],
        _hessian: &mut LayerGrads,
        _prev_delta2: &mut [f64],
    ) {
    }
}
