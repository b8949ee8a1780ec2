use ndarray::{s, Array1, Array2, ArrayView2};

use crate::error::Result;
use crate::utils::{check_not_empty, vector_norm, Real, Tolerances};

const REORTHOGONALIZATION_PASSES: usize = 2;

/// Thin QR factorization `A = Q·R` of an `M×N` matrix.
///
/// `Q` is `M×N` with orthonormal columns, except that a column whose
/// Gram-Schmidt residual vanishes is stored as zeros. The matching diagonal
/// entry of `R` then holds the (near-zero) residual norm, which is how rank
/// deficiency shows up without an error.
#[derive(Debug, Clone)]
pub struct QR<T: Real> {
    q: Array2<T>,
    r: Array2<T>,
}

impl<T: Real> QR<T> {
    /// Classical Gram-Schmidt with one re-orthogonalization pass (CGS2).
    ///
    /// A single classical pass loses orthogonality in proportion to how close
    /// the columns are to collinear; the second pass brings `QᵗQ` back to
    /// rounding level at twice the projection cost.
    pub fn new(a: ArrayView2<T>, tolerances: &Tolerances) -> Result<Self> {
        check_not_empty(&a)?;
        let (m, n) = a.dim();
        let mut q = Array2::<T>::zeros((m, n));
        let mut r = Array2::<T>::zeros((n, n));

        for j in 0..n {
            let column = a.column(j);
            let mut residual: Array1<T> = column.to_owned();
            for _ in 0..REORTHOGONALIZATION_PASSES {
                let previous = q.slice(s![.., ..j]);
                let projections = previous.t().dot(&residual);
                residual = residual - previous.dot(&projections);
                for (i, &projection) in projections.iter().enumerate() {
                    r[[i, j]] += projection;
                }
            }

            let norm = vector_norm(&residual);
            r[[j, j]] = norm;
            if norm > tolerances.degenerate_norm(vector_norm(&column), m) {
                q.column_mut(j).assign(&(residual / norm));
            }
        }

        Ok(QR { q, r })
    }

    pub fn q(&self) -> &Array2<T> {
        &self.q
    }

    pub fn r(&self) -> &Array2<T> {
        &self.r
    }

    pub fn into_parts(self) -> (Array2<T>, Array2<T>) {
        (self.q, self.r)
    }

    pub fn reconstruct(&self) -> Array2<T> {
        self.q.dot(&self.r)
    }
}
