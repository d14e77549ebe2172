pub struct MseLoss;

impl MseLoss {
    /// Pointwise squared error: (y - t)² / 2
    pub fn f(y: f64, t: f64) -> f64 {
        (y - t) * (y - t) / 2.0
    }

    /// Pointwise gradient: y - t
    pub fn df(y: f64, t: f64) -> f64 {
        y - t
    }
}
