use thiserror::Error;

/// Returned when an index argument falls outside the range an operation accepts.
///
/// `len` is the length of the `GrowVec` at the time of the call, before any mutation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("index {index} out of range for length {len}")]
pub struct OutOfRangeError {
    pub index: usize,
    pub len: usize,
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PolicyError {
    #[error("growth factor must be between 1.0 and 4.0, got {0}")]
    InvalidGrowthFactor(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = OutOfRangeError { index: 4, len: 3 };
        assert_eq!(err.to_string(), "index 4 out of range for length 3");

        let err = PolicyError::InvalidGrowthFactor(0.5);
        assert_eq!(
            err.to_string(),
            "growth factor must be between 1.0 and 4.0, got 0.5"
        );
    }
}
