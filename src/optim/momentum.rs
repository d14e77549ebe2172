use std::collections::HashMap;

use crate::optim::optimizer::{state_for, Optimizer, ParamId};

/// Gradient descent with momentum:
/// `v = μ·v - α·(dw + λ·w);  w += v`
#[derive(Debug, Clone)]
pub struct Momentum {
    pub learning_rate: f64,
    pub momentum: f64,
    pub weight_decay: f64,
    velocity: HashMap<ParamId, Vec<f64>>,
}

impl Momentum {
    pub fn new(learning_rate: f64, momentum: f64) -> Momentum {
        Momentum { learning_rate, momentum, weight_decay: 0.0, velocity: HashMap::new() }
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Momentum::new(0.01, 0.9)
    }
}

impl Optimizer for Momentum {
    fn reset(&mut self) {
        self.velocity.clear();
    }

    fn update(&mut self, id: ParamId, dw: &[f64], _hessian: &[f64], weights: &mut [f64]) {
        let v = state_for(&mut self.velocity, id, weights.len());
        for ((w, g), vi) in weights.iter_mut().zip(dw.iter()).zip(v.iter_mut()) {
            *vi = self.momentum * *vi - self.learning_rate * (g + *w * self.weight_decay);
            *w += *vi;
        }
    }
}
