use serde::{Serialize, Deserialize};

/// Per-unit nonlinearity applied at the end of a layer.
///
/// Derivatives are expressed in terms of the activation's *output* `y`, since
/// that is what the layer chain caches during forward propagation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Identity,
    Sigmoid,
    #[serde(rename = "relu")]
    ReLU,
    #[serde(rename = "leaky_relu")]
    LeakyReLU { alpha: f64 },
    Elu { alpha: f64 },
    /// Softmax couples every unit of the layer, so its Jacobian row is dense.
    Softmax,
    Tanh,
    /// `(tanh(x) + 1) / 2`, a tanh rescaled onto (0, 1).
    #[serde(rename = "tanh_p1m2")]
    TanhP1M2,
}

impl ActivationFunction {
    /// Applies the activation to a whole layer in place, turning
    /// pre-activation values into outputs.
    pub fn apply(&self, values: &mut [f64]) {
        match self {
            ActivationFunction::Softmax => softmax(values),
            _ => {
                for v in values.iter_mut() {
                    *v = self.function(*v);
                }
            }
        }
    }

    /// Element-wise activation. `Softmax` is normalised over the layer in
    /// `apply`; here it only contributes the unnormalised exponential.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { x } else { alpha * x },
            ActivationFunction::Elu { alpha } => {
                if x > 0.0 { x } else { alpha * (x.exp() - 1.0) }
            }
            ActivationFunction::Softmax => x.exp(),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::TanhP1M2 => (x.tanh() + 1.0) / 2.0,
        }
    }

    /// Derivative with respect to the pre-activation, evaluated from the
    /// output value `y`. For `Softmax` this is the diagonal of the Jacobian.
    pub fn df(&self, y: f64) -> f64 {
        match self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::Sigmoid => y * (1.0 - y),
            ActivationFunction::ReLU => if y > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::LeakyReLU { alpha } => if y > 0.0 { 1.0 } else { *alpha },
            ActivationFunction::Elu { alpha } => if y > 0.0 { 1.0 } else { y + alpha },
            ActivationFunction::Softmax => y * (1.0 - y),
            ActivationFunction::Tanh => 1.0 - y * y,
            ActivationFunction::TanhP1M2 => 2.0 * y * (1.0 - y),
        }
    }

    /// Row `i` of the Jacobian `dy/da` over the whole output vector `y`.
    ///
    /// Element-wise activations only have a diagonal entry; softmax gives
    /// `y[i] * (δij - y[j])` for every `j`.
    pub fn df_row(&self, y: &[f64], i: usize) -> Vec<f64> {
        match self {
            ActivationFunction::Softmax => y
                .iter()
                .enumerate()
                .map(|(j, &yj)| if j == i { y[i] * (1.0 - y[i]) } else { -y[i] * yj })
                .collect(),
            _ => {
                let mut row = vec![0.0; y.len()];
                row[i] = self.df(y[i]);
                row
            }
        }
    }

    /// Declared `(min, max)` target values, used to encode class labels.
    pub fn scale(&self) -> (f64, f64) {
        match self {
            ActivationFunction::Softmax => (0.0, 1.0),
            ActivationFunction::Tanh => (-0.8, 0.8),
            _ => (0.1, 0.9),
        }
    }
}

fn softmax(values: &mut [f64]) {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut denom = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        denom += *v;
    }
    for v in values.iter_mut() {
        *v /= denom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_df(h: ActivationFunction, x: f64) -> f64 {
        let step = 1e-6;
        (h.function(x + step) - h.function(x - step)) / (2.0 * step)
    }

    #[test]
    fn output_space_derivatives_match_finite_differences() {
        let kinds = [
            ActivationFunction::Identity,
            ActivationFunction::Sigmoid,
            ActivationFunction::ReLU,
            ActivationFunction::LeakyReLU { alpha: 0.01 },
            ActivationFunction::Elu { alpha: 1.0 },
            ActivationFunction::Tanh,
            ActivationFunction::TanhP1M2,
        ];
        for h in kinds {
            for &x in &[-1.3, -0.2, 0.4, 2.1] {
                let y = h.function(x);
                assert!((h.df(y) - numeric_df(h, x)).abs() < 1e-6, "{:?} at {}", h, x);
            }
        }
    }

    #[test]
    fn softmax_sums_to_one_and_is_shift_invariant() {
        let mut a = vec![1.0, 2.0, 3.0];
        let mut b = vec![101.0, 102.0, 103.0];
        ActivationFunction::Softmax.apply(&mut a);
        ActivationFunction::Softmax.apply(&mut b);
        assert!((a.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn softmax_jacobian_row_matches_finite_differences() {
        let pre = [0.3, -0.7, 1.1];
        let mut y = pre.to_vec();
        ActivationFunction::Softmax.apply(&mut y);
        let step = 1e-6;
        for i in 0..3 {
            let row = ActivationFunction::Softmax.df_row(&y, i);
            let mut plus = pre;
            let mut minus = pre;
            plus[i] += step;
            minus[i] -= step;
            let mut yp = plus.to_vec();
            let mut ym = minus.to_vec();
            ActivationFunction::Softmax.apply(&mut yp);
            ActivationFunction::Softmax.apply(&mut ym);
            for j in 0..3 {
                let numeric = (yp[j] - ym[j]) / (2.0 * step);
                assert!((row[j] - numeric).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn elementwise_jacobian_row_is_diagonal() {
        let y = [0.2, 0.5, 0.9];
        let row = ActivationFunction::Sigmoid.df_row(&y, 1);
        assert_eq!(row, vec![0.0, 0.25, 0.0]);
    }
}
