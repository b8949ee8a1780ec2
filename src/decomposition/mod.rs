//! # Matrix Decompositions
//!
//! Dense factorizations over `ndarray` matrices:
//!
//! - **QR** ([`QR`]): classical Gram-Schmidt, rank deficiency shows up as zero columns of `Q`
//! - **Eigen** ([`Eigen`]): unshifted QR iteration for symmetric matrices, with a
//!   convergence flag, iteration count and residual
//! - **SVD** ([`SVD`]): eigendecomposition of the Gram matrix `AᵗA`
//! - **LU** ([`LU`], [`PartialPivLU`]): Doolittle without pivoting, and the
//!   partially pivoted primitive used for inverses, solves and determinants
//! - **Cholesky** ([`Cholesky`]): symmetric positive-definite matrices only
//!
//! Every decomposition allocates fresh results and leaves its input untouched.

use ndarray::{ArrayBase, Data, Ix2};

use crate::error::Result;
use crate::utils::{Real, Tolerances};

mod cholesky;
mod eigen;
mod lu;
mod qr;
mod svd;

pub use cholesky::Cholesky;
pub use eigen::Eigen;
pub use lu::{PartialPivLU, LU};
pub use qr::QR;
pub use svd::SVD;

/// Decompositions with the default [`Tolerances`].
pub trait Decompose<T: Real> {
    fn qr(&self) -> Result<QR<T>>;

    /// Intended for symmetric input; see [`Eigen`].
    fn eigen(&self) -> Result<Eigen<T>>;

    fn svd(&self) -> Result<SVD<T>>;

    fn lu(&self) -> Result<LU<T>>;

    fn lu_pivoted(&self) -> Result<PartialPivLU<T>>;

    fn cholesky(&self) -> Result<Cholesky<T>>;
}

impl<T: Real, S: Data<Elem = T>> Decompose<T> for ArrayBase<S, Ix2> {
    fn qr(&self) -> Result<QR<T>> {
        QR::new(self.view(), &Tolerances::default())
    }

    fn eigen(&self) -> Result<Eigen<T>> {
        Eigen::new(self.view(), &Tolerances::default())
    }

    fn svd(&self) -> Result<SVD<T>> {
        SVD::new(self.view(), &Tolerances::default())
    }

    fn lu(&self) -> Result<LU<T>> {
        LU::new(self.view(), &Tolerances::default())
    }

    fn lu_pivoted(&self) -> Result<PartialPivLU<T>> {
        PartialPivLU::new(self.view(), &Tolerances::default())
    }

    fn cholesky(&self) -> Result<Cholesky<T>> {
        Cholesky::new(self.view(), &Tolerances::default())
    }
}
