use log::{debug, trace, warn};
use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::decomposition::qr::QR;
use crate::error::Result;
use crate::utils::{
    asymmetry, check_square, descending_order, frobenius_norm, off_diagonal_sum, vector_norm, Real,
    Tolerances,
};

/// Eigendecomposition of a real symmetric matrix by unshifted QR iteration.
///
/// Eigenvalues are sorted in descending order and column `i` of
/// `eigenvectors` belongs to `eigenvalues[i]`. The iteration has no spectral
/// shift, so the input must be symmetric (Gram and covariance matrices are the
/// intended use). Results after the iteration cap are returned as well; check
/// [`Eigen::converged`] and [`Eigen::residual`] before trusting them.
#[derive(Debug, Clone)]
pub struct Eigen<T: Real> {
    eigenvalues: Array1<T>,
    eigenvectors: Array2<T>,
    converged: bool,
    iterations: usize,
    residual: T,
}

impl<T: Real> Eigen<T> {
    pub fn new(a: ArrayView2<T>, tolerances: &Tolerances) -> Result<Self> {
        let n = check_square(&a)?;
        let symmetry_threshold = T::epsilon().sqrt() * frobenius_norm(&a).max(T::one());
        if let Some((row, col)) = asymmetry(&a, symmetry_threshold) {
            warn!(
                "Eigen solver received a non-symmetric matrix (first mismatch at ({}, {})); eigenvalues may be meaningless",
                row, col
            );
        }

        let convergence = tolerances.convergence::<T>();
        let mut current = a.to_owned();
        let mut vectors = Array2::<T>::eye(n);
        let mut iterations = 0;
        let mut residual = off_diagonal_sum(&current.view());

        while residual >= convergence && iterations < tolerances.max_iterations {
            let (q, r) = QR::new(current.view(), tolerances)?.into_parts();
            current = r.dot(&q);
            vectors = vectors.dot(&q);
            iterations += 1;
            residual = off_diagonal_sum(&current.view());
            trace!("QR iteration {}: off-diagonal sum {}", iterations, residual);
        }

        let converged = residual < convergence;
        if converged {
            debug!("Eigen solver converged after {} iterations", iterations);
        } else {
            warn!(
                "Eigen solver stopped at the iteration cap ({}) with off-diagonal sum {}",
                iterations, residual
            );
        }

        complete_basis(&mut vectors);

        let diagonal: Vec<T> = current.diag().to_vec();
        let order = descending_order(&diagonal);
        let eigenvalues = order.iter().map(|&i| diagonal[i]).collect::<Array1<T>>();
        let eigenvectors = vectors.select(Axis(1), &order);

        Ok(Eigen {
            eigenvalues,
            eigenvectors,
            converged,
            iterations,
            residual,
        })
    }

    pub fn eigenvalues(&self) -> &Array1<T> {
        &self.eigenvalues
    }

    pub fn eigenvectors(&self) -> &Array2<T> {
        &self.eigenvectors
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Off-diagonal absolute sum of the last iterate.
    pub fn residual(&self) -> T {
        self.residual
    }

    pub fn into_parts(self) -> (Array1<T>, Array2<T>) {
        (self.eigenvalues, self.eigenvectors)
    }

    /// `V·diag(λ)·Vᵗ`
    pub fn reconstruct(&self) -> Array2<T> {
        let scaled = &self.eigenvectors * &self.eigenvalues;
        scaled.dot(&self.eigenvectors.t())
    }
}

/// Replaces zero columns (left by degenerate QR steps) with unit vectors
/// orthogonal to every other column.
fn complete_basis<T: Real>(vectors: &mut Array2<T>) {
    let n = vectors.ncols();
    let half = T::one() / (T::one() + T::one());
    let mut filled: Vec<bool> = (0..n)
        .map(|j| vector_norm(&vectors.column(j)) > half)
        .collect();

    for j in 0..n {
        if filled[j] {
            continue;
        }

        let mut best: Option<(T, Array1<T>)> = None;
        for k in 0..vectors.nrows() {
            let mut candidate = Array1::<T>::zeros(vectors.nrows());
            candidate[k] = T::one();
            // Two passes of classical Gram-Schmidt keep the completion orthogonal.
            for _ in 0..2 {
                for c in (0..n).filter(|&c| filled[c]) {
                    let basis = vectors.column(c);
                    let projection = basis.dot(&candidate);
                    candidate.scaled_add(-projection, &basis);
                }
            }
            let norm = vector_norm(&candidate);
            if best.as_ref().map_or(true, |(best_norm, _)| norm > *best_norm) {
                best = Some((norm, candidate));
            }
        }

        if let Some((norm, candidate)) = best {
            if norm > T::epsilon() {
                vectors.column_mut(j).assign(&(candidate / norm));
                filled[j] = true;
            }
        }
    }
}
