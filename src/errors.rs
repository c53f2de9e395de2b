use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SizingError {
    #[error("Invalid design: {0}")]
    InvalidDesign(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(
        "Optimizer did not converge after {iterations} iterations (max violation {max_violation:.3e})"
    )]
    NotConverged {
        iterations: usize,
        max_violation: f64,
    },

    #[error("Solver error: {0}")]
    SolverError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SizingError {
    /// True for errors raised by the model itself rather than the solver.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            SizingError::InvalidDesign(_) | SizingError::InvalidParameter(_)
        )
    }
}

pub type SizingResult<T> = Result<T, SizingError>;
