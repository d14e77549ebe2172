use std::collections::HashMap;

use crate::optim::optimizer::{state_for, Optimizer, ParamId};

const EPS: f64 = 1e-8;

/// RMSprop: step normalised by a moving average of squared gradients.
#[derive(Debug, Clone)]
pub struct RmsProp {
    pub learning_rate: f64,
    /// Decay of the squared-gradient average.
    pub decay: f64,
    mean_square: HashMap<ParamId, Vec<f64>>,
}

impl RmsProp {
    pub fn new(learning_rate: f64, decay: f64) -> RmsProp {
        RmsProp { learning_rate, decay, mean_square: HashMap::new() }
    }
}

impl Default for RmsProp {
    fn default() -> Self {
        RmsProp::new(0.0001, 0.99)
    }
}

impl Optimizer for RmsProp {
    fn reset(&mut self) {
        self.mean_square.clear();
    }

    fn update(&mut self, id: ParamId, dw: &[f64], _hessian: &[f64], weights: &mut [f64]) {
        let ms = state_for(&mut self.mean_square, id, weights.len());
        for ((w, g), m) in weights.iter_mut().zip(dw.iter()).zip(ms.iter_mut()) {
            *m = self.decay * *m + (1.0 - self.decay) * g * g;
            *w -= self.learning_rate * g / (*m + EPS).sqrt();
        }
    }
}
