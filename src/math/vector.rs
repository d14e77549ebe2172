//! Helpers over dense `f64` vectors, the currency between every component.

/// Dot product of two equal-length slices.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Index of the maximum element. Ties resolve to the first occurrence;
/// an empty slice yields 0.
pub fn max_index(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, x) in v.iter().enumerate().skip(1) {
        if *x > v[best] {
            best = i;
        }
    }
    best
}

/// Largest element, or negative infinity for an empty slice.
pub fn max_value(v: &[f64]) -> f64 {
    v.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// `dst[i] += src[i]`
pub fn add_assign(dst: &mut [f64], src: &[f64]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d += s;
    }
}

/// `v[i] *= factor`
pub fn scale(v: &mut [f64], factor: f64) {
    for x in v.iter_mut() {
        *x *= factor;
    }
}

pub fn has_non_finite(v: &[f64]) -> bool {
    v.iter().any(|x| !x.is_finite())
}
