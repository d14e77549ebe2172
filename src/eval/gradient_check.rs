use rand::Rng;
use std::str::FromStr;

use crate::error::{NetworkError, Result};
use crate::network::{Network, Target, Workspace};
use crate::optim::{Optimizer, ParamId, ParamKind};

/// Perturbation applied to a weight for the central difference.
const STEP: f64 = 1e-10;

/// Coordinates checked per weight and per bias vector in `Random` mode.
const RANDOM_CHECKS: usize = 10;

/// Which coordinates `gradient_check` verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradCheckMode {
    /// Every weight and bias of every layer.
    All,
    /// A few uniformly drawn weights and biases per layer.
    Random,
}

impl FromStr for GradCheckMode {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(GradCheckMode::All),
            "random" => Ok(GradCheckMode::Random),
            other => Err(NetworkError::UnknownGradCheckMode(other.to_string())),
        }
    }
}

impl<O: Optimizer> Network<O> {
    /// Compares backpropagated gradients with central-difference estimates
    /// over the whole data set. Returns `Ok(false)` at the first coordinate
    /// where they differ by more than `epsilon`.
    ///
    /// Each checked coordinate costs two loss evaluations and one full
    /// forward/backward pass over `inputs`.
    pub fn gradient_check<I: AsRef<[f64]>>(
        &mut self,
        inputs: &[I],
        labels: &[usize],
        epsilon: f64,
        mode: GradCheckMode,
    ) -> Result<bool> {
        self.check_training_data(inputs, labels)?;

        for layer in 1..self.layers.len() {
            let (n_weights, n_biases) = match self.layers.node(layer) {
                Some(l) => (l.weight().len(), l.bias().len()),
                None => continue,
            };
            if n_weights == 0 {
                continue;
            }

            let mut coordinates = Vec::new();
            for (id, len) in [(ParamId::weight(layer), n_weights), (ParamId::bias(layer), n_biases)] {
                match mode {
                    GradCheckMode::All => coordinates.extend((0..len).map(|i| (id, i))),
                    GradCheckMode::Random if len > 0 => {
                        for _ in 0..RANDOM_CHECKS {
                            coordinates.push((id, self.rng.gen_range(0..len)));
                        }
                    }
                    GradCheckMode::Random => {}
                }
            }

            for (id, index) in coordinates {
                let diff = self.calc_delta(inputs, labels, id, index)?;
                if diff > epsilon {
                    log::debug!(
                        "gradient check failed at layer {} {:?}[{}]: |analytic - numeric| = {}",
                        id.layer,
                        id.kind,
                        index,
                        diff
                    );
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// `|analytic - numeric|` for one coordinate.
    fn calc_delta<I: AsRef<[f64]>>(
        &mut self,
        inputs: &[I],
        labels: &[usize],
        id: ParamId,
        index: usize,
    ) -> Result<f64> {
        let original = self.param(id)[index];

        self.param(id)[index] = original + STEP;
        let f_plus = self.total_loss(inputs, labels)?;
        self.param(id)[index] = original - STEP;
        let f_minus = self.total_loss(inputs, labels)?;
        self.param(id)[index] = original;

        let numeric = (f_plus - f_minus) / (2.0 * STEP);

        let mut ws = Workspace::for_chain(&self.layers);
        for (input, &label) in inputs.iter().zip(labels) {
            let output = self.fprop(input.as_ref(), &mut ws)?.to_vec();
            self.bprop(&output, Target::Label(label), &mut ws)?;
        }
        let grads = ws.grads(id.layer);
        let analytic = match id.kind {
            ParamKind::Weight => grads.dw[index],
            ParamKind::Bias => grads.db[index],
        };

        Ok((analytic - numeric).abs())
    }

    fn total_loss<I: AsRef<[f64]>>(&self, inputs: &[I], labels: &[usize]) -> Result<f64> {
        let mut sum = 0.0;
        for (input, &label) in inputs.iter().zip(labels) {
            sum += self.sample_loss(input.as_ref(), Target::Label(label))?;
        }
        Ok(sum)
    }

    fn param(&mut self, id: ParamId) -> &mut [f64] {
        match self.layers.node_mut(id.layer) {
            Some(layer) => match id.kind {
                ParamKind::Weight => layer.weight_mut(),
                ParamKind::Bias => layer.bias_mut(),
            },
            None => &mut [],
        }
    }
}
