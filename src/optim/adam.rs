use std::collections::HashMap;

use crate::optim::optimizer::{Optimizer, ParamId};

/// Adam (Adaptive Moment Estimation).
///
/// ```text
/// m_t = β1 * m_{t-1} + (1 - β1) * gradient
/// v_t = β2 * v_{t-1} + (1 - β2) * gradient²
/// parameter -= α * (m_t / (1 - β1^t)) / (√(v_t / (1 - β2^t)) + ε)
/// ```
///
/// The time step `t` is tracked per parameter vector.
#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    moments: HashMap<ParamId, AdamState>,
}

#[derive(Debug, Clone)]
struct AdamState {
    m: Vec<f64>,
    v: Vec<f64>,
    t: i32,
}

impl Adam {
    pub fn new(learning_rate: f64, beta1: f64, beta2: f64, epsilon: f64) -> Adam {
        Adam { learning_rate, beta1, beta2, epsilon, moments: HashMap::new() }
    }
}

impl Default for Adam {
    fn default() -> Self {
        Adam::new(0.001, 0.9, 0.999, 1e-8)
    }
}

impl Optimizer for Adam {
    fn reset(&mut self) {
        self.moments.clear();
    }

    fn update(&mut self, id: ParamId, dw: &[f64], _hessian: &[f64], weights: &mut [f64]) {
        let n = weights.len();
        let state = self
            .moments
            .entry(id)
            .or_insert_with(|| AdamState { m: vec![0.0; n], v: vec![0.0; n], t: 0 });
        state.t += 1;
        let bias1 = 1.0 - self.beta1.powi(state.t);
        let bias2 = 1.0 - self.beta2.powi(state.t);

        for (i, (w, g)) in weights.iter_mut().zip(dw.iter()).enumerate() {
            state.m[i] = self.beta1 * state.m[i] + (1.0 - self.beta1) * g;
            state.v[i] = self.beta2 * state.v[i] + (1.0 - self.beta2) * g * g;
            let m_hat = state.m[i] / bias1;
            let v_hat = state.v[i] / bias2;
            *w -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
        }
    }
}
