use std::fmt;

use thiserror::Error;

/// Which operand of a similarity computation an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorSide {
    /// First argument.
    Left,
    /// Second argument.
    Right,
}

impl fmt::Display for VectorSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorSide::Left => f.write_str("left"),
            VectorSide::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimilarityError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("degenerate vector: {side} vector has zero magnitude")]
    DegenerateVector { side: VectorSide },
}
