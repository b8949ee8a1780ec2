//! # Inverses and Linear Systems
//!
//! Inversion and `A·x = b` solving go through the partially pivoted LU
//! factorization, so all three share one pivoting strategy. The pseudo-inverse
//! and least squares go through the Gram-matrix SVD and accept any shape.

use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Data, Ix1, Ix2};

use crate::decomposition::{PartialPivLU, SVD};
use crate::error::{LinalgError, Result};
use crate::utils::{Real, Tolerances};

/// Inverse of a square matrix.
///
/// Fails with [`LinalgError::Singular`] when no pivot of magnitude above the
/// zero threshold is available for some column.
pub fn inverse<T: Real>(a: ArrayView2<T>, tolerances: &Tolerances) -> Result<Array2<T>> {
    PartialPivLU::new(a, tolerances)?.inverse()
}

/// Moore-Penrose pseudo-inverse `A⁺ = V·Σ⁺·Uᵗ` of an `M×N` matrix (result is `N×M`).
///
/// Singular values at or below the cutoff contribute nothing, which makes the
/// result well defined for rank-deficient and non-square input.
pub fn pseudo_inverse<T: Real>(a: ArrayView2<T>, tolerances: &Tolerances) -> Result<Array2<T>> {
    let svd = SVD::new(a, tolerances)?;
    let (m, n) = a.dim();
    let cutoff = svd.cutoff();
    let (u, s, vt) = svd.into_parts();

    let retained: Vec<(usize, T)> = s
        .iter()
        .enumerate()
        .filter(|&(_, &sigma)| sigma > cutoff)
        .map(|(k, &sigma)| (k, T::one() / sigma))
        .collect();

    Ok(Array2::from_shape_fn((n, m), |(i, j)| {
        retained
            .iter()
            .map(|&(k, inverse_sigma)| vt[[k, i]] * inverse_sigma * u[[j, k]])
            .sum()
    }))
}

/// Solves `A·x = b` for square `A`.
pub fn solve<T: Real, S: Data<Elem = T>>(
    a: ArrayView2<T>,
    b: &ArrayBase<S, Ix1>,
    tolerances: &Tolerances,
) -> Result<Array1<T>> {
    check_rows(&a, b.len())?;
    PartialPivLU::new(a, tolerances)?.solve_vector(b)
}

/// Solves `A·X = B` for square `A`, one column of `B` at a time.
pub fn solve_matrix<T: Real, S: Data<Elem = T>>(
    a: ArrayView2<T>,
    b: &ArrayBase<S, Ix2>,
    tolerances: &Tolerances,
) -> Result<Array2<T>> {
    check_rows(&a, b.nrows())?;
    PartialPivLU::new(a, tolerances)?.solve_matrix(b)
}

/// Minimum-norm least-squares solution `x = A⁺·b` for any `M×N` matrix.
pub fn least_squares<T: Real, S: Data<Elem = T>>(
    a: ArrayView2<T>,
    b: &ArrayBase<S, Ix1>,
    tolerances: &Tolerances,
) -> Result<Array1<T>> {
    check_rows(&a, b.len())?;
    Ok(pseudo_inverse(a, tolerances)?.dot(b))
}

fn check_rows<T>(a: &ArrayView2<T>, rows: usize) -> Result<()> {
    if a.nrows() != rows {
        return Err(LinalgError::DimensionMismatch {
            context: "right-hand side rows",
            expected: a.nrows(),
            found: rows,
        });
    }
    Ok(())
}

/// Inverses and solvers with the default [`Tolerances`].
pub trait MatrixSolve<T: Real> {
    fn inv(&self) -> Result<Array2<T>>;

    fn pinv(&self) -> Result<Array2<T>>;

    fn solve<S: Data<Elem = T>>(&self, b: &ArrayBase<S, Ix1>) -> Result<Array1<T>>;

    fn solve_matrix<S: Data<Elem = T>>(&self, b: &ArrayBase<S, Ix2>) -> Result<Array2<T>>;

    fn lstsq<S: Data<Elem = T>>(&self, b: &ArrayBase<S, Ix1>) -> Result<Array1<T>>;
}

impl<T: Real, D: Data<Elem = T>> MatrixSolve<T> for ArrayBase<D, Ix2> {
    fn inv(&self) -> Result<Array2<T>> {
        inverse(self.view(), &Tolerances::default())
    }

    fn pinv(&self) -> Result<Array2<T>> {
        pseudo_inverse(self.view(), &Tolerances::default())
    }

    fn solve<S: Data<Elem = T>>(&self, b: &ArrayBase<S, Ix1>) -> Result<Array1<T>> {
        solve(self.view(), b, &Tolerances::default())
    }

    fn solve_matrix<S: Data<Elem = T>>(&self, b: &ArrayBase<S, Ix2>) -> Result<Array2<T>> {
        solve_matrix(self.view(), b, &Tolerances::default())
    }

    fn lstsq<S: Data<Elem = T>>(&self, b: &ArrayBase<S, Ix1>) -> Result<Array1<T>> {
        least_squares(self.view(), b, &Tolerances::default())
    }
}
