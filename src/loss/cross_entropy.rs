/// Binary cross-entropy, applied independently to every output unit.
/// Canonical partner of Sigmoid (and, by convention, Tanh) outputs.
pub struct CrossEntropyLoss;

/// Small epsilon added inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// -t·log(y) - (1 - t)·log(1 - y)
    pub fn f(y: f64, t: f64) -> f64 {
        -t * (y + EPS).ln() - (1.0 - t) * (1.0 - y + EPS).ln()
    }

    /// -t / y + (1 - t) / (1 - y), i.e. (y - t) / (y·(1 - y)) away from the edges.
    pub fn df(y: f64, t: f64) -> f64 {
        -t / (y + EPS) + (1.0 - t) / (1.0 - y + EPS)
    }
}
