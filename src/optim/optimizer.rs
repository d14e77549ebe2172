use std::collections::HashMap;

/// Which vector of which layer an update targets. Stateful optimizers key
/// their per-parameter history on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId {
    pub layer: usize,
    pub kind: ParamKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Weight,
    Bias,
}

impl ParamId {
    pub fn weight(layer: usize) -> ParamId {
        ParamId { layer, kind: ParamKind::Weight }
    }

    pub fn bias(layer: usize) -> ParamId {
        ParamId { layer, kind: ParamKind::Bias }
    }
}

/// Weight-update rule driven by the training loop.
///
/// `update` is called once per mini-batch for every weight and bias vector,
/// after the per-task gradients have been merged and averaged over the batch.
pub trait Optimizer: Send + Sync {
    /// Forgets all per-parameter history. Called at the start of every
    /// `train` run.
    fn reset(&mut self);

    /// Whether `update` reads the Hessian-diagonal estimate. When true the
    /// training loop runs a second-order pass at the start of every epoch.
    fn requires_hessian(&self) -> bool {
        false
    }

    /// Applies one step to `weights` given the averaged gradient `dw` and the
    /// Hessian-diagonal estimate `hessian` (zeros unless `requires_hessian`).
    fn update(&mut self, id: ParamId, dw: &[f64], hessian: &[f64], weights: &mut [f64]);
}

/// Per-parameter state vector, created zeroed on first use.
pub(crate) fn state_for<'a>(
    states: &'a mut HashMap<ParamId, Vec<f64>>,
    id: ParamId,
    len: usize,
) -> &'a mut Vec<f64> {
    states.entry(id).or_insert_with(|| vec![0.0; len])
}
