use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LinalgError {
    /// Matrix or vector without any elements
    #[error("Matrix or vector is empty")]
    Empty,
    /// Non-square matrix encountered in operations requiring square matrices
    #[error("Matrix with {rows} rows and {cols} cols is not square")]
    NotSquare { rows: usize, cols: usize },
    #[error("Dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Matrix is not symmetric at ({row}, {col})")]
    NotSymmetric { row: usize, col: usize },
    /// Non-positive diagonal entry encountered during a Cholesky factorization
    #[error("Matrix is not positive definite (diagonal entry {index})")]
    NotPositiveDefinite { index: usize },
    /// Pivot magnitude fell below the zero threshold
    #[error("Matrix is singular (pivot {pivot} below zero threshold)")]
    Singular { pivot: usize },
    #[error("Vector has zero norm")]
    ZeroNorm,
}

pub type Result<T> = std::result::Result<T, LinalgError>;
