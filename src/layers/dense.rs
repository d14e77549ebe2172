use rand::RngCore;
use rayon::prelude::*;

use crate::activation::ActivationFunction;
use crate::layers::layer::{Layer, LayerGrads, Shape3d};
use crate::math::{vector, WeightInit};

/// Fully-connected layer: `y = h(W·x + b)`.
///
/// `weights[c * size + i]` connects input `c` to output `i`.
#[derive(Debug)]
pub struct FullyConnected {
    pub size: usize,
    pub input_size: usize,
    pub weights: Vec<f64>,
    pub biases: Vec<f64>,
    pub activator: ActivationFunction,
    weight_init: WeightInit,
    bias_init: WeightInit,
    parallelize: bool,
}

impl FullyConnected {
    /// Creates a layer with zeroed parameters; the network initializes them
    /// before training.
    pub fn new(size: usize, input_size: usize, activation: ActivationFunction) -> FullyConnected {
        FullyConnected {
            size,
            input_size,
            weights: vec![0.0; size * input_size],
            biases: vec![0.0; size],
            activator: activation,
            weight_init: WeightInit::Xavier,
            bias_init: WeightInit::Constant(0.0),
            parallelize: false,
        }
    }

    fn pre_activation(&self, input: &[f64], i: usize) -> f64 {
        let mut a = self.biases[i];
        for (c, x) in input.iter().enumerate() {
            a += self.weights[c * self.size + i] * x;
        }
        a
    }
}

impl Layer for FullyConnected {
    fn layer_type(&self) -> &'static str {
        "fully-connected"
    }

    fn in_shape(&self) -> Shape3d {
        Shape3d::flat(self.input_size)
    }

    fn out_shape(&self) -> Shape3d {
        Shape3d::flat(self.size)
    }

    fn activation(&self) -> ActivationFunction {
        self.activator
    }

    fn weight(&self) -> &[f64] {
        &self.weights
    }

    fn bias(&self) -> &[f64] {
        &self.biases
    }

    fn weight_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    fn bias_mut(&mut self) -> &mut [f64] {
        &mut self.biases
    }

    fn set_weight_init(&mut self, init: WeightInit) {
        self.weight_init = init;
    }

    fn set_bias_init(&mut self, init: WeightInit) {
        self.bias_init = init;
    }

    fn init_weight(&mut self, rng: &mut dyn RngCore) {
        let (fan_in, fan_out) = (self.fan_in(), self.fan_out());
        self.weight_init.fill(&mut self.weights, fan_in, fan_out, rng);
        self.bias_init.fill(&mut self.biases, fan_in, fan_out, rng);
    }

    fn set_parallelize(&mut self, parallelize: bool) {
        self.parallelize = parallelize;
    }

    fn forward(&self, input: &[f64], output: &mut [f64]) {
        if self.parallelize {
            output
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, a)| *a = self.pre_activation(input, i));
        } else {
            for (i, a) in output.iter_mut().enumerate() {
                *a = self.pre_activation(input, i);
            }
        }
        self.activator.apply(output);
    }

    fn backward(
        &self,
        prev_out: &[f64],
        prev_activation: ActivationFunction,
        curr_delta: &[f64],
        grads: &mut LayerGrads,
        prev_delta: &mut [f64],
    ) {
        let size = self.size;

        // δ_prev[c] = Σ_i δ[i]·W[c, i] · h'_prev(y_prev[c])
        for (c, pd) in prev_delta.iter_mut().enumerate() {
            let row = &self.weights[c * size..(c + 1) * size];
            *pd = vector::dot(curr_delta, row) * prev_activation.df(prev_out[c]);
        }

        // dW[c, i] += δ[i]·y_prev[c]
        let accumulate = |(c, dw_row): (usize, &mut [f64])| {
            let x = prev_out[c];
            for (g, d) in dw_row.iter_mut().zip(curr_delta.iter()) {
                *g += d * x;
            }
        };
        if self.parallelize {
            grads.dw.par_chunks_mut(size).enumerate().for_each(accumulate);
        } else {
            grads.dw.chunks_mut(size).enumerate().for_each(accumulate);
        }

        vector::add_assign(&mut grads.db, curr_delta);
    }

    fn backward_2nd(
        &self,
        prev_out: &[f64],
        prev_activation: ActivationFunction,
        curr_delta2: &[f64],
        hessian: &mut LayerGrads,
        prev_delta2: &mut [f64],
    ) {
        let size = self.size;

        for (c, hw_row) in hessian.dw.chunks_mut(size).enumerate() {
            let x2 = prev_out[c] * prev_out[c];
            for (h, d) in hw_row.iter_mut().zip(curr_delta2.iter()) {
                *h += d * x2;
            }
        }

        vector::add_assign(&mut hessian.db, curr_delta2);

        for (c, pd) in prev_delta2.iter_mut().enumerate() {
            let row = &self.weights[c * size..(c + 1) * size];
            let sum: f64 = row.iter().zip(curr_delta2.iter()).map(|(w, d)| d * w * w).sum();
            let df = prev_activation.df(prev_out[c]);
            *pd = sum * df * df;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_2x3() -> FullyConnected {
        let mut fc = FullyConnected::new(3, 2, ActivationFunction::Identity);
        // rows are inputs, columns outputs
        fc.weights = vec![1.0, 2.0, 3.0, -1.0, 0.5, 0.0];
        fc.biases = vec![0.1, 0.2, 0.3];
        fc
    }

    #[test]
    fn forward_is_affine_map() {
        let fc = layer_2x3();
        let mut out = vec![0.0; 3];
        fc.forward(&[2.0, 1.0], &mut out);
        let expected = [2.0 - 1.0 + 0.1, 4.0 + 0.5 + 0.2, 6.0 + 0.0 + 0.3];
        for (o, e) in out.iter().zip(expected.iter()) {
            assert!((o - e).abs() < 1e-12);
        }
    }

    #[test]
    fn parallel_forward_matches_sequential() {
        let mut fc = layer_2x3();
        let mut seq = vec![0.0; 3];
        fc.forward(&[0.3, -0.4], &mut seq);
        fc.set_parallelize(true);
        let mut par = vec![0.0; 3];
        fc.forward(&[0.3, -0.4], &mut par);
        assert_eq!(seq, par);
    }

    #[test]
    fn backward_accumulates_outer_product() {
        let fc = layer_2x3();
        let mut grads = LayerGrads::for_layer(&fc);
        let mut prev_delta = vec![0.0; 2];
        let delta = [1.0, 0.0, -1.0];
        fc.backward(&[2.0, 3.0], ActivationFunction::Identity, &delta, &mut grads, &mut prev_delta);
        fc.backward(&[2.0, 3.0], ActivationFunction::Identity, &delta, &mut grads, &mut prev_delta);

        assert_eq!(grads.dw, vec![4.0, 0.0, -4.0, 6.0, 0.0, -6.0]);
        assert_eq!(grads.db, vec![2.0, 0.0, -2.0]);
        assert_eq!(prev_delta, vec![1.0 - 3.0, -1.0 - 0.0]);
    }

    #[test]
    fn init_respects_configured_initializers() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut fc = FullyConnected::new(4, 3, ActivationFunction::Sigmoid);
        fc.set_bias_init(WeightInit::Constant(0.5));
        let mut rng = StdRng::seed_from_u64(3);
        fc.init_weight(&mut rng);
        assert!(fc.weights.iter().any(|w| *w != 0.0));
        assert_eq!(fc.biases, vec![0.5; 4]);
    }
}
