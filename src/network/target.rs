use crate::error::{NetworkError, Result};

/// Training signal for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target<'a> {
    /// Full target vector (regression).
    Vector(&'a [f64]),
    /// Class index, expanded with the output activation's target range.
    Label(usize),
    /// Supervises a single output coordinate and leaves the others free.
    Partial { index: usize, value: f64 },
}

impl Target<'_> {
    /// Checks the signal against a network with `out_dim` outputs.
    pub fn validate(&self, out_dim: usize) -> Result<()> {
        match *self {
            Target::Vector(t) if t.len() != out_dim => {
                Err(NetworkError::OutputDimensionMismatch { expected: out_dim, actual: t.len() })
            }
            Target::Label(label) if label >= out_dim => {
                Err(NetworkError::LabelOutOfRange { label, out_dim })
            }
            Target::Partial { index, .. } if index >= out_dim => {
                Err(NetworkError::PartialIndexOutOfRange { index, out_dim })
            }
            _ => Ok(()),
        }
    }
}

/// Anything usable as a training signal.
pub trait AsTarget {
    fn as_target(&self) -> Target<'_>;
}

impl AsTarget for Vec<f64> {
    fn as_target(&self) -> Target<'_> {
        Target::Vector(self)
    }
}

impl AsTarget for [f64] {
    fn as_target(&self) -> Target<'_> {
        Target::Vector(self)
    }
}

impl AsTarget for usize {
    fn as_target(&self) -> Target<'_> {
        Target::Label(*self)
    }
}

impl AsTarget for (usize, f64) {
    fn as_target(&self) -> Target<'_> {
        Target::Partial { index: self.0, value: self.1 }
    }
}

impl AsTarget for Target<'_> {
    fn as_target(&self) -> Target<'_> {
        *self
    }
}

impl<T: AsTarget + ?Sized> AsTarget for &T {
    fn as_target(&self) -> Target<'_> {
        (**self).as_target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_the_matching_variant() {
        assert_eq!(vec![0.5, 1.0].as_target(), Target::Vector(&[0.5, 1.0]));
        assert_eq!(3usize.as_target(), Target::Label(3));
        assert_eq!((1usize, 0.25).as_target(), Target::Partial { index: 1, value: 0.25 });
        let label = 2usize;
        assert_eq!((&label).as_target(), Target::Label(2));
    }

    #[test]
    fn validation_names_the_mismatch() {
        assert!(Target::Vector(&[0.0, 1.0]).validate(2).is_ok());
        assert!(matches!(
            Target::Vector(&[0.0]).validate(2),
            Err(NetworkError::OutputDimensionMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            Target::Label(2).validate(2),
            Err(NetworkError::LabelOutOfRange { label: 2, out_dim: 2 })
        ));
        assert!(matches!(
            Target::Partial { index: 5, value: 0.0 }.validate(3),
            Err(NetworkError::PartialIndexOutOfRange { index: 5, out_dim: 3 })
        ));
    }
}
