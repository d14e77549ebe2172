pub struct HuberLoss;

/// Transition point between the quadratic and linear regions.
const DELTA: f64 = 1.0;

impl HuberLoss {
    /// h(x) = 0.5·x²  if |x| ≤ δ
    ///        δ·(|x| − 0.5·δ)  otherwise
    /// where x = y − t
    pub fn f(y: f64, t: f64) -> f64 {
        let x = y - t;
        if x.abs() <= DELTA {
            0.5 * x * x
        } else {
            DELTA * (x.abs() - 0.5 * DELTA)
        }
    }

    /// x  if |x| ≤ δ,  else δ·sign(x)
    pub fn df(y: f64, t: f64) -> f64 {
        let x = y - t;
        if x.abs() <= DELTA { x } else { DELTA * x.signum() }
    }
}
