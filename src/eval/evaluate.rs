use rayon::prelude::*;

use crate::error::{NetworkError, Result};
use crate::eval::test_result::TestResult;
use crate::network::{AsTarget, Network, Target};
use crate::optim::Optimizer;

impl<O: Optimizer> Network<O> {
    /// Classifies every input and tallies the predictions against `labels`.
    pub fn test<I: AsRef<[f64]>>(&self, inputs: &[I], labels: &[usize]) -> Result<TestResult> {
        if inputs.len() != labels.len() {
            return Err(NetworkError::DataMismatch { inputs: inputs.len(), targets: labels.len() });
        }
        let mut result = TestResult::new();
        for (i, (input, &actual)) in inputs.iter().zip(labels).enumerate() {
            let predicted = self.predict_label(input.as_ref()).map_err(|e| e.at_sample(i))?;
            result.record(predicted, actual);
        }
        Ok(result)
    }

    /// Raw outputs for every input, computed in parallel, in input order.
    pub fn test_outputs<I: AsRef<[f64]> + Sync>(&self, inputs: &[I]) -> Result<Vec<Vec<f64>>> {
        inputs
            .par_iter()
            .enumerate()
            .map(|(i, input)| self.predict(input.as_ref()).map_err(|e| e.at_sample(i)))
            .collect()
    }

    /// Total loss over a data set. Per-sample losses are computed in
    /// parallel and summed in sample order afterwards.
    pub fn get_loss<I, T>(&self, inputs: &[I], targets: &[T]) -> Result<f64>
    where
        I: AsRef<[f64]> + Sync,
        T: AsTarget + Sync,
    {
        if inputs.len() != targets.len() {
            return Err(NetworkError::DataMismatch { inputs: inputs.len(), targets: targets.len() });
        }
        let losses: Vec<f64> = inputs
            .par_iter()
            .zip(targets.par_iter())
            .enumerate()
            .map(|(i, (input, target))| {
                self.sample_loss(input.as_ref(), target.as_target())
                    .map_err(|e| e.at_sample(i))
            })
            .collect::<Result<_>>()?;
        Ok(losses.iter().sum())
    }

    /// Loss of one sample against any training signal. A partial target
    /// only scores its own coordinate.
    pub(crate) fn sample_loss(&self, input: &[f64], target: Target<'_>) -> Result<f64> {
        target.validate(self.out_dim())?;
        let output = self.predict(input)?;
        let loss = self.loss();
        Ok(match target {
            Target::Vector(t) => loss.total(&output, t),
            Target::Label(label) => loss.total(&output, &self.label2vector(label)?),
            Target::Partial { index, value } => loss.f(output[index], value),
        })
    }
}
