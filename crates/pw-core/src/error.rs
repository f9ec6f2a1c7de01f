/// Alias for `Result<T, GachaError>`.
pub type GachaResult<T> = Result<T, GachaError>;

/// Errors raised by the probability engine.
///
/// `DimensionMismatch`, `SingularMatrix` and `Uninitialized` point at a defect
/// in how a chain was built and are never caused by caller input; neither is
/// `ThreadPool`.
/// `UnsupportedCombination` and `InvalidRequest` are caller errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GachaError {
    /// The matrix is not square, or the right-hand side disagrees with it.
    #[error("dimension mismatch: {rows}x{cols} matrix with right-hand side of length {rhs}")]
    DimensionMismatch {
        /// Number of matrix rows.
        rows: usize,
        /// Number of matrix columns.
        cols: usize,
        /// Length (row count) of the right-hand side.
        rhs: usize,
    },

    /// Partial pivoting found an exactly zero pivot.
    #[error("singular matrix: zero pivot in column {column}")]
    SingularMatrix {
        /// Column in which elimination failed.
        column: usize,
    },

    /// A cached table was read before it was built.
    #[error("table for {0} has not been initialized")]
    Uninitialized(String),

    /// No variant is registered for the requested game and pool.
    #[error("unsupported game and pool combination: {game}-{pool}")]
    UnsupportedCombination {
        /// Requested game key.
        game: String,
        /// Requested pool key.
        pool: String,
    },

    /// A dedicated simulation thread pool could not be started.
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// A request failed validation before reaching the engine.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GachaError {
    /// Returns true if the error was caused by caller input rather than a
    /// defect in the engine.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedCombination { .. } | Self::InvalidRequest(_)
        )
    }
}
