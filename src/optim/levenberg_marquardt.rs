use crate::optim::optimizer::{Optimizer, ParamId};

/// Stochastic diagonal Levenberg–Marquardt: each weight's step is scaled by
/// the inverse of its curvature estimate, `w -= α / (h + μ) · dw`.
///
/// Needs the Hessian-diagonal estimate, so the training loop runs a
/// second-order pass before every epoch.
#[derive(Debug, Clone)]
pub struct LevenbergMarquardt {
    pub learning_rate: f64,
    /// Damping added to the curvature so flat directions stay bounded.
    pub mu: f64,
}

impl LevenbergMarquardt {
    pub fn new(learning_rate: f64, mu: f64) -> LevenbergMarquardt {
        LevenbergMarquardt { learning_rate, mu }
    }
}

impl Default for LevenbergMarquardt {
    fn default() -> Self {
        LevenbergMarquardt::new(0.00085, 0.02)
    }
}

impl Optimizer for LevenbergMarquardt {
    fn reset(&mut self) {}

    fn requires_hessian(&self) -> bool {
        true
    }

    fn update(&mut self, _id: ParamId, dw: &[f64], hessian: &[f64], weights: &mut [f64]) {
        for ((w, g), h) in weights.iter_mut().zip(dw.iter()).zip(hessian.iter()) {
            *w -= self.learning_rate / (h + self.mu) * g;
        }
    }
}
