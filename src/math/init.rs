use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Strategy used to fill a layer's weight or bias vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInit {
    /// Uniform on ±sqrt(6 / (fan_in + fan_out)). Default for weights.
    Xavier,
    /// Uniform on ±1 / sqrt(fan_in).
    Lecun,
    /// He initialization: samples from N(0, sqrt(2 / fan_in)).
    ///
    /// Recommended before ReLU layers. The variance 2/fan_in accounts for
    /// the fact that ReLU zeroes half of its inputs on average.
    He,
    /// N(0, sigma).
    Gaussian(f64),
    /// Every element set to the given value. `Constant(0.0)` is the bias default.
    Constant(f64),
}

impl WeightInit {
    /// Overwrites `values` in place. `fan_in` / `fan_out` are the number of
    /// incoming and outgoing connections per unit of the owning layer.
    pub fn fill<R: Rng + ?Sized>(&self, values: &mut [f64], fan_in: usize, fan_out: usize, rng: &mut R) {
        match *self {
            WeightInit::Xavier => {
                let range = (6.0 / (fan_in + fan_out).max(1) as f64).sqrt();
                fill_uniform(values, range, rng);
            }
            WeightInit::Lecun => {
                let range = 1.0 / (fan_in.max(1) as f64).sqrt();
                fill_uniform(values, range, rng);
            }
            WeightInit::He => {
                let std_dev = (2.0 / fan_in.max(1) as f64).sqrt();
                for v in values.iter_mut() {
                    *v = sample_standard_normal(rng) * std_dev;
                }
            }
            WeightInit::Gaussian(sigma) => {
                for v in values.iter_mut() {
                    *v = sample_standard_normal(rng) * sigma;
                }
            }
            WeightInit::Constant(c) => values.iter_mut().for_each(|v| *v = c),
        }
    }
}

fn fill_uniform<R: Rng + ?Sized>(values: &mut [f64], range: f64, rng: &mut R) {
    for v in values.iter_mut() {
        *v = rng.gen::<f64>() * 2.0 * range - range;
    }
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // Draw two independent uniform samples in (0, 1] to avoid log(0).
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
