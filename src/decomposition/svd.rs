use log::debug;
use ndarray::{s, Array1, Array2, ArrayView2, Axis};

use crate::decomposition::eigen::Eigen;
use crate::error::Result;
use crate::utils::{check_not_empty, descending_order, vector_norm, Real, Tolerances};

/// Thin singular value decomposition `A = U·diag(s)·Vᵗ` with `k = min(M, N)`.
///
/// Computed from the eigendecomposition of the Gram matrix `AᵗA`, so the cost
/// is dominated by an `N×N` eigen solve. Singular values are the norms
/// `‖A·v_i‖` of the right singular vectors mapped through `A`, sorted
/// descending together with their columns of `V`. Columns of `U` belonging to
/// singular values at or below the cutoff
/// (see [`Tolerances::singular_value_cutoff`]) are left as zeros.
#[derive(Debug, Clone)]
pub struct SVD<T: Real> {
    u: Array2<T>,
    s: Array1<T>,
    vt: Array2<T>,
    cutoff: T,
    converged: bool,
}

impl<T: Real> SVD<T> {
    pub fn new(a: ArrayView2<T>, tolerances: &Tolerances) -> Result<Self> {
        check_not_empty(&a)?;
        let (m, n) = a.dim();
        let k = m.min(n);

        let gram = a.t().dot(&a);
        let eigen = Eigen::new(gram.view(), tolerances)?;
        let converged = eigen.converged();
        let (_, eigenvectors) = eigen.into_parts();

        // σ_i = ‖A·v_i‖ equals √λ_i but keeps rounding near ε·σ_max instead of √ε·σ_max.
        let eigenvectors = eigenvectors.slice(s![.., ..k]);
        let projected = a.dot(&eigenvectors);
        let norms: Vec<T> = projected
            .columns()
            .into_iter()
            .map(|column| vector_norm(&column))
            .collect();
        let order = descending_order(&norms);
        let s: Array1<T> = order.iter().map(|&i| norms[i]).collect();
        let v = eigenvectors.select(Axis(1), &order);
        let projected = projected.select(Axis(1), &order);

        let cutoff = tolerances.singular_value_cutoff(s[0], m, n);
        let mut u = Array2::<T>::zeros((m, k));
        for (i, &sigma) in s.iter().enumerate() {
            if sigma > cutoff {
                u.column_mut(i).assign(&(&projected.column(i) / sigma));
            }
        }
        debug!(
            "SVD of {}x{} matrix: {} of {} singular values above cutoff {}",
            m,
            n,
            s.iter().filter(|&&sigma| sigma > cutoff).count(),
            k,
            cutoff
        );

        Ok(SVD {
            u,
            s,
            vt: v.reversed_axes(),
            cutoff,
            converged,
        })
    }

    pub fn u(&self) -> &Array2<T> {
        &self.u
    }

    pub fn s(&self) -> &Array1<T> {
        &self.s
    }

    pub fn vt(&self) -> &Array2<T> {
        &self.vt
    }

    /// Singular values at or below this value are treated as zero.
    pub fn cutoff(&self) -> T {
        self.cutoff
    }

    /// Whether the underlying eigen iteration met its convergence threshold.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Number of singular values above the cutoff.
    pub fn rank(&self) -> usize {
        self.s.iter().filter(|&&sigma| sigma > self.cutoff).count()
    }

    pub fn into_parts(self) -> (Array2<T>, Array1<T>, Array2<T>) {
        (self.u, self.s, self.vt)
    }

    // U·diag(s)·Vᵗ
    pub fn reconstruct(&self) -> Array2<T> {
        (&self.u * &self.s).dot(&self.vt)
    }
}
