use thiserror::Error;

/// An invalid half-open range `[begin, end)` passed to one of the range sorts.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("range start {begin} is past range end {end}")]
    Inverted { begin: usize, end: usize },
    #[error("range end {end} is out of bounds for a sequence of length {len}")]
    OutOfBounds { end: usize, len: usize },
}

impl RangeError {
    /// Checks `begin <= end <= len`.
    pub fn check(begin: usize, end: usize, len: usize) -> Result<(), RangeError> {
        if begin > end {
            Err(RangeError::Inverted { begin, end })
        } else if end > len {
            Err(RangeError::OutOfBounds { end, len })
        } else {
            Ok(())
        }
    }
}
