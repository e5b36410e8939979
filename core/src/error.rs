use thiserror::Error;

/// Structural failures: bad coordinates, bad configuration, bad encodings.
///
/// "No path" and "no marker" are ordinary solver outcomes and never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("position ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("unknown cell code {0}")]
    InvalidCellCode(u8),

    #[error("grid shape mismatch: expected {expected_rows}x{expected_cols}, found {found_rows}x{found_cols}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        found_rows: usize,
        found_cols: usize,
    },
}

pub type Result<T, E = MazeError> = std::result::Result<T, E>;
