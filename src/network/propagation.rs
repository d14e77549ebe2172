//! Forward and backward propagation through a network's layer chain.

use crate::activation::ActivationFunction;
use crate::error::{NetworkError, Result};
use crate::layers::LayerGrads;
use crate::loss::LossFunction;
use crate::math::vector;
use crate::network::network::Network;
use crate::network::target::Target;
use crate::network::workspace::Workspace;
use crate::optim::Optimizer;

/// Whether `(activation, loss)` is a pairing whose loss gradient times
/// activation derivative reduces to `output - target`.
pub fn is_canonical_link(activation: ActivationFunction, loss: LossFunction) -> bool {
    matches!(
        (activation, loss),
        (ActivationFunction::Sigmoid, LossFunction::CrossEntropy)
            | (ActivationFunction::Tanh, LossFunction::CrossEntropy)
            | (ActivationFunction::Identity, LossFunction::Mse)
            | (ActivationFunction::Softmax, LossFunction::CrossEntropyMulticlass)
    )
}

/// `delta[i] = output[i] - target[i]`
pub fn canonical_delta(output: &[f64], target: &[f64]) -> Vec<f64> {
    output.iter().zip(target.iter()).map(|(y, t)| y - t).collect()
}

/// dE/da by the chain rule: `delta[i] = dot(dE/dy, dy/da_i)`.
///
/// Uses the full Jacobian row, so activations that couple their units
/// (softmax) are handled exactly.
pub fn chain_rule_delta(
    loss: LossFunction,
    activation: ActivationFunction,
    output: &[f64],
    target: &[f64],
) -> Vec<f64> {
    let de_dy = loss.gradient(output, target);
    (0..output.len())
        .map(|i| vector::dot(&de_dy, &activation.df_row(output, i)))
        .collect()
}

impl<O: Optimizer> Network<O> {
    /// Runs `input` through every layer, caching intermediate outputs in
    /// `ws`, and returns the network output.
    pub fn fprop<'w>(&self, input: &[f64], ws: &'w mut Workspace) -> Result<&'w [f64]> {
        self.check_usable()?;
        self.check_input(input)?;
        if !ws.fits_outputs(&self.layers) {
            return Err(NetworkError::WorkspaceMismatch("output buffers belong to another chain"));
        }
        Ok(self.layers.forward(input, ws))
    }

    /// Largest output value for `input`.
    pub fn fprop_max(&self, input: &[f64], ws: &mut Workspace) -> Result<f64> {
        self.fprop(input, ws).map(vector::max_value)
    }

    /// Index of the largest output for `input`.
    pub fn fprop_max_index(&self, input: &[f64], ws: &mut Workspace) -> Result<usize> {
        self.fprop(input, ws).map(vector::max_index)
    }

    /// Whether the output activation `h` is canonically linked to this
    /// network's loss.
    pub fn is_canonical_link(&self, h: ActivationFunction) -> bool {
        is_canonical_link(h, self.loss())
    }

    /// Target value of an inactive class, from the output activation's range.
    pub fn target_value_min(&self) -> f64 {
        self.layers.tail().activation().scale().0
    }

    /// Target value of the active class, from the output activation's range.
    pub fn target_value_max(&self) -> f64 {
        self.layers.tail().activation().scale().1
    }

    /// Target vector for class `label`: `target_value_max()` at `label`,
    /// `target_value_min()` everywhere else.
    pub fn label2vector(&self, label: usize) -> Result<Vec<f64>> {
        let out_dim = self.out_dim();
        if label >= out_dim {
            return Err(NetworkError::LabelOutOfRange { label, out_dim });
        }
        let mut target = vec![self.target_value_min(); out_dim];
        target[label] = self.target_value_max();
        Ok(target)
    }

    /// dE/da of the output layer for one sample.
    pub fn output_delta(&self, output: &[f64], target: Target<'_>) -> Result<Vec<f64>> {
        if output.len() != self.out_dim() {
            return Err(NetworkError::OutputDimensionMismatch { expected: self.out_dim(), actual: output.len() });
        }
        target.validate(self.out_dim())?;
        let h = self.layers.tail().activation();
        let canonical = self.is_canonical_link(h);

        let delta = match target {
            Target::Vector(t) if canonical => canonical_delta(output, t),
            Target::Vector(t) => chain_rule_delta(self.loss(), h, output, t),
            Target::Label(label) => {
                let t = self.label2vector(label)?;
                if canonical {
                    canonical_delta(output, &t)
                } else {
                    chain_rule_delta(self.loss(), h, output, &t)
                }
            }
            Target::Partial { index, value } if canonical => {
                let mut delta = vec![0.0; output.len()];
                delta[index] = output[index] - value;
                delta
            }
            Target::Partial { index, value } => {
                let mut t = output.to_vec();
                t[index] = value;
                chain_rule_delta(self.loss(), h, output, &t)
            }
        };
        Ok(delta)
    }

    /// Backpropagates the error of `output` against `target` and adds every
    /// layer's gradient into `ws`.
    ///
    /// `output` must come from the last `fprop` through the same workspace.
    /// The output, the target and the workspace are validated before any
    /// gradient is touched.
    pub fn bprop(&self, output: &[f64], target: Target<'_>, ws: &mut Workspace) -> Result<()> {
        if !ws.matches(&self.layers) {
            return Err(NetworkError::WorkspaceMismatch("no gradient slots for this chain"));
        }
        let delta = self.output_delta(output, target)?;
        self.layers.backward(delta, ws);
        Ok(())
    }

    /// Second-order pass: adds a diagonal Hessian estimate for the sample
    /// last propagated through `ws` into `hessian`.
    ///
    /// For non-canonical pairings the activation derivative is squared; the
    /// result is an approximation, not the exact diagonal.
    pub fn bprop_2nd(&self, output: &[f64], ws: &Workspace, hessian: &mut [LayerGrads]) {
        let h = self.layers.tail().activation();
        let t_max = self.target_value_max();

        let delta2: Vec<f64> = if self.is_canonical_link(h) {
            output.iter().map(|&y| t_max * h.df(y)).collect()
        } else {
            output
                .iter()
                .map(|&y| {
                    let df = h.df(y);
                    t_max * df * df
                })
                .collect()
        };

        self.layers.backward_2nd(delta2, ws, hessian);
    }
}
