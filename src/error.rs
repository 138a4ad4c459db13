use derive_more::{Display, From};

use crate::types::Value;

pub type Result<T> = core::result::Result<T, MarchingCubesError>;

/// Reasons a sampling grid is rejected before any field evaluation.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum GridError {
    /// Fewer than two lattice points along an axis.
    #[display("resolution along axis {axis} is {count}, need at least 2")]
    ResolutionTooSmall { axis: usize, count: usize },
    /// `max` is not strictly greater than `min` along an axis.
    #[display("bounds along axis {axis} are not increasing ({min} >= {max})")]
    InvertedBounds { axis: usize, min: Value, max: Value },
    /// A bound component is NaN or infinite.
    #[display("bounds along axis {axis} are not finite")]
    NonFiniteBounds { axis: usize },
}

impl std::error::Error for GridError {}

#[derive(Debug, Display, From)]
pub enum MarchingCubesError {
    /// Bad resolution or bounds.
    #[display("invalid grid: {_0}")]
    InvalidGrid(GridError),
    /// The field returned a non-finite value while running in strict mode.
    #[display("field evaluated to {value} at {point:?}")]
    #[from(ignore)]
    FieldEvaluation { point: [Value; 3], value: Value },
    /// A triangle referenced a vertex that does not exist.
    #[display("vertex index {index} out of bounds for {len} vertices")]
    #[from(ignore)]
    InvalidIndex { index: usize, len: usize },
    #[display("i/o error: {_0}")]
    Io(std::io::Error),
    #[display("lattice shape error: {_0}")]
    Shape(ndarray::ShapeError),
}

impl std::error::Error for MarchingCubesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MarchingCubesError::InvalidGrid(e) => Some(e),
            MarchingCubesError::Io(e) => Some(e),
            MarchingCubesError::Shape(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_errors_convert_and_display() {
        let err: MarchingCubesError = GridError::ResolutionTooSmall { axis: 1, count: 1 }.into();
        assert!(matches!(err, MarchingCubesError::InvalidGrid(_)));
        assert_eq!(
            err.to_string(),
            "invalid grid: resolution along axis 1 is 1, need at least 2"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: MarchingCubesError = io.into();
        assert!(matches!(err, MarchingCubesError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
