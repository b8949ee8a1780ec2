use ndarray::{Array2, ArrayView2};

use crate::error::{LinalgError, Result};
use crate::utils::{asymmetry, check_square, Real, Tolerances};

/// Cholesky factorization `A = L·Lᵗ` of a symmetric positive-definite matrix.
#[derive(Debug, Clone)]
pub struct Cholesky<T: Real> {
    l: Array2<T>,
}

impl<T: Real> Cholesky<T> {
    /// Rejects matrices whose mirrored entries differ by the zero threshold or
    /// more, and signals [`LinalgError::NotPositiveDefinite`] when a diagonal
    /// entry of `L` would be the root of a non-positive number.
    pub fn new(a: ArrayView2<T>, tolerances: &Tolerances) -> Result<Self> {
        let n = check_square(&a)?;
        if let Some((row, col)) = asymmetry(&a, tolerances.zero::<T>()) {
            return Err(LinalgError::NotSymmetric { row, col });
        }

        let mut l = Array2::<T>::zeros((n, n));
        for j in 0..n {
            let sum: T = (0..j).map(|k| l[[j, k]] * l[[j, k]]).sum();
            let diagonal = a[[j, j]] - sum;
            if diagonal <= T::zero() {
                return Err(LinalgError::NotPositiveDefinite { index: j });
            }
            let root = diagonal.sqrt();
            l[[j, j]] = root;

            for i in j + 1..n {
                let sum: T = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
                l[[i, j]] = (a[[i, j]] - sum) / root;
            }
        }

        Ok(Cholesky { l })
    }

    pub fn l(&self) -> &Array2<T> {
        &self.l
    }

    pub fn into_l(self) -> Array2<T> {
        self.l
    }

    pub fn reconstruct(&self) -> Array2<T> {
        self.l.dot(&self.l.t())
    }
}
