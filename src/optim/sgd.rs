use crate::optim::optimizer::{Optimizer, ParamId};

/// Plain gradient descent with optional L2 weight decay:
/// `w -= learning_rate · (dw + weight_decay · w)`
#[derive(Debug, Clone)]
pub struct Sgd {
    pub learning_rate: f64,
    pub weight_decay: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate, weight_decay: 0.0 }
    }

    pub fn with_weight_decay(learning_rate: f64, weight_decay: f64) -> Sgd {
        Sgd { learning_rate, weight_decay }
    }
}

impl Default for Sgd {
    fn default() -> Self {
        Sgd::new(0.01)
    }
}

impl Optimizer for Sgd {
    fn reset(&mut self) {}

    fn update(&mut self, _id: ParamId, dw: &[f64], _hessian: &[f64], weights: &mut [f64]) {
        for (w, g) in weights.iter_mut().zip(dw.iter()) {
            *w -= self.learning_rate * (g + *w * self.weight_decay);
        }
    }
}
