/// Categorical cross-entropy for use with a Softmax output layer.
pub struct CrossEntropyMulticlassLoss;

const EPS: f64 = 1e-12;

impl CrossEntropyMulticlassLoss {
    /// -t·log(y); summed over the output vector this is the usual
    /// `-sum(expected[i] * log(predicted[i]))`.
    pub fn f(y: f64, t: f64) -> f64 {
        -t * (y + EPS).ln()
    }

    /// -t / y
    ///
    /// Composed with the softmax Jacobian this collapses to `y - t` whenever
    /// the target sums to one, which is why the pair is a canonical link.
    pub fn df(y: f64, t: f64) -> f64 {
        -t / (y + EPS)
    }
}
