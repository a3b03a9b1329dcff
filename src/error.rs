use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error("zoom level {zoom_level} would shrink the grid range below the minimum width")]
    ViewportRejected { zoom_level: i32 },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Failure raised while compiling or evaluating one formula.
///
/// Formula failures are isolated to their own series; they never abort a
/// batch of formulas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{formula}: {message}")]
pub struct FormulaError {
    pub formula: String,
    pub message: String,
}

impl FormulaError {
    #[must_use]
    pub fn new(formula: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
            message: message.into(),
        }
    }
}
