pub struct MaeLoss;

impl MaeLoss {
    /// |y - t|
    pub fn f(y: f64, t: f64) -> f64 {
        (y - t).abs()
    }

    /// Subgradient: sign(y - t), 0 when equal
    pub fn df(y: f64, t: f64) -> f64 {
        let diff = y - t;
        if diff > 0.0 { 1.0 } else if diff < 0.0 { -1.0 } else { 0.0 }
    }
}
