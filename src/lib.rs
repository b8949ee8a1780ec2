//! Dense matrix decompositions and derived quantities over `ndarray`.
//!
//! Single precision is the default scalar; every algorithm is generic over
//! [`Real`], so `f64` matrices work as well.
//!
//! ```
//! use ndarray::array;
//! use single_linalg::{Decompose, MatrixProperties, MatrixSolve};
//!
//! let a = array![[4.0f32, 2.0], [2.0, 3.0]];
//! let chol = a.cholesky().unwrap();
//! assert!((chol.l()[[1, 1]] - 2.0f32.sqrt()).abs() < 1e-5);
//! assert!((a.determinant().unwrap() - 8.0).abs() < 1e-4);
//! assert_eq!(a.inv().unwrap().dim(), (2, 2));
//! ```

pub mod decomposition;
pub mod dimred;
pub mod error;
pub mod properties;
pub mod regression;
pub mod solve;
mod utils;

#[cfg(test)]
mod test_utils;

pub use decomposition::Decompose;
pub use error::{LinalgError, Result};
pub use properties::MatrixProperties;
pub use solve::MatrixSolve;
pub use utils::Real;
pub use utils::Tolerances;
pub use utils::{frobenius_norm, is_symmetric, normalize, vector_norm};
pub use utils::{CONVERGENCE_THRESHOLD, MAX_EIGEN_ITERATIONS, ZERO_THRESHOLD};

/// Dense row-major matrix.
pub type Matrix<T = f32> = ndarray::Array2<T>;

/// Dense vector.
pub type Vector<T = f32> = ndarray::Array1<T>;
