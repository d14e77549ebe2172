use std::collections::HashMap;

use crate::optim::optimizer::{state_for, Optimizer, ParamId};

const EPS: f64 = 1e-8;

/// Adagrad: per-parameter step shrinks with the accumulated squared gradient.
#[derive(Debug, Clone)]
pub struct Adagrad {
    pub learning_rate: f64,
    accumulated: HashMap<ParamId, Vec<f64>>,
}

impl Adagrad {
    pub fn new(learning_rate: f64) -> Adagrad {
        Adagrad { learning_rate, accumulated: HashMap::new() }
    }
}

impl Default for Adagrad {
    fn default() -> Self {
        Adagrad::new(0.01)
    }
}

impl Optimizer for Adagrad {
    fn reset(&mut self) {
        self.accumulated.clear();
    }

    fn update(&mut self, id: ParamId, dw: &[f64], _hessian: &[f64], weights: &mut [f64]) {
        let g2 = state_for(&mut self.accumulated, id, weights.len());
        for ((w, g), acc) in weights.iter_mut().zip(dw.iter()).zip(g2.iter_mut()) {
            *acc += g * g;
            *w -= self.learning_rate * g / (acc.sqrt() + EPS);
        }
    }
}
