use serde::{Serialize, Deserialize};

use crate::loss::{CrossEntropyLoss, CrossEntropyMulticlassLoss, HuberLoss, MaeLoss, MseLoss};

/// Selects the loss function a network is trained against.
///
/// The variant doubles as the loss's type tag for canonical-link detection.
///
/// - `Mse`                   : squared error; canonical with Identity output.
/// - `CrossEntropy`          : binary cross-entropy; canonical with Sigmoid and Tanh output.
/// - `CrossEntropyMulticlass`: categorical cross-entropy; canonical with Softmax output.
/// - `Mae`                   : absolute error.
/// - `Huber`                 : Huber loss (δ=1.0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFunction {
    Mse,
    CrossEntropy,
    CrossEntropyMulticlass,
    Mae,
    Huber,
}

impl LossFunction {
    /// Pointwise loss for one output coordinate.
    pub fn f(&self, y: f64, t: f64) -> f64 {
        match self {
            LossFunction::Mse                    => MseLoss::f(y, t),
            LossFunction::CrossEntropy           => CrossEntropyLoss::f(y, t),
            LossFunction::CrossEntropyMulticlass => CrossEntropyMulticlassLoss::f(y, t),
            LossFunction::Mae                    => MaeLoss::f(y, t),
            LossFunction::Huber                  => HuberLoss::f(y, t),
        }
    }

    /// Pointwise dE/dy for one output coordinate.
    pub fn df(&self, y: f64, t: f64) -> f64 {
        match self {
            LossFunction::Mse                    => MseLoss::df(y, t),
            LossFunction::CrossEntropy           => CrossEntropyLoss::df(y, t),
            LossFunction::CrossEntropyMulticlass => CrossEntropyMulticlassLoss::df(y, t),
            LossFunction::Mae                    => MaeLoss::df(y, t),
            LossFunction::Huber                  => HuberLoss::df(y, t),
        }
    }

    /// Loss of one sample: the sum of the pointwise losses.
    pub fn total(&self, output: &[f64], target: &[f64]) -> f64 {
        debug_assert_eq!(output.len(), target.len());
        output.iter().zip(target.iter()).map(|(&y, &t)| self.f(y, t)).sum()
    }

    /// dE/dy for every output coordinate.
    pub fn gradient(&self, output: &[f64], target: &[f64]) -> Vec<f64> {
        debug_assert_eq!(output.len(), target.len());
        output.iter().zip(target.iter()).map(|(&y, &t)| self.df(y, t)).collect()
    }
}
